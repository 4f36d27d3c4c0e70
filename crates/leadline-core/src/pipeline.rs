//! The submission pipeline.
//!
//! One call to [`SubmissionPipeline::submit_form_data`] walks a submission
//! through local validation, the connectivity probe, the rate limiter and a
//! bounded insert loop, and always comes back with a [`SubmissionOutcome`].
//! At most one store call is in flight per submission.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt as _;
use leadline_store::{StoreError, SubmissionStore};
use tracing::{debug, error, info, warn};

use crate::classify::{classify, probe_failed, rate_limited, unexpected};
use crate::config::{PipelineConfig, backoff_delay};
use crate::fingerprint::identity_hash;
use crate::rate_limit::RateLimiter;
use crate::types::{
    ConnectionStatus, NormalizedSubmission, PipelineState, SubmissionInput, SubmissionOutcome,
};

/// Network identifier assumed when the caller cannot supply one.
pub const DEFAULT_NETWORK_IDENTIFIER: &str = "127.0.0.1";

/// Connection-test error reported when the store has no URL or key.
pub const MISSING_STORE_CONFIGURATION: &str = "Missing store configuration";

/// Validates, normalizes and persists lead submissions.
pub struct SubmissionPipeline {
    store: Arc<dyn SubmissionStore>,
    limiter: RateLimiter,
    config: PipelineConfig,
}

impl SubmissionPipeline {
    /// Create a pipeline with a fresh rate limiter sized by `config`.
    #[must_use]
    pub fn new(store: Arc<dyn SubmissionStore>, config: PipelineConfig) -> Self {
        let limiter = config.rate_limiter();
        Self::with_limiter(store, limiter, config)
    }

    /// Create a pipeline sharing an existing rate limiter.
    #[must_use]
    pub fn with_limiter(
        store: Arc<dyn SubmissionStore>,
        limiter: RateLimiter,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            limiter,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[must_use]
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Check that the store is reachable and accepts our credentials.
    ///
    /// Never touches the submissions table and never panics outward.
    pub async fn test_connection(&self) -> ConnectionStatus {
        match AssertUnwindSafe(self.store.check_session())
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => ConnectionStatus::ok(),
            Ok(Err(StoreError::Config(reason))) => {
                warn!(reason = %reason, "store is not configured");
                ConnectionStatus::failed(MISSING_STORE_CONFIGURATION)
            }
            Ok(Err(err)) => {
                warn!(error = %err, "store connection test failed");
                ConnectionStatus::failed(err.to_string())
            }
            Err(payload) => {
                error!(cause = %panic_message(&*payload), "store connection test panicked");
                ConnectionStatus::failed("Failed to connect to database")
            }
        }
    }

    /// Submit one form.
    ///
    /// `network_identifier` is the caller's network origin (typically an IP
    /// address); only its salted hash is used or stored. Local validation
    /// failures return before any network call. A panic anywhere below is
    /// reported as an `unknown`, retryable outcome.
    pub async fn submit_form_data(
        &self,
        input: &SubmissionInput,
        network_identifier: &str,
    ) -> SubmissionOutcome {
        if let Err(err) = input.validate() {
            debug!(error = %err, "submission failed local validation");
            return SubmissionOutcome::invalid(&err);
        }

        match AssertUnwindSafe(self.run(input, network_identifier))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(payload) => {
                let cause = panic_message(&*payload);
                error!(cause = %cause, "submission pipeline panicked");
                SubmissionOutcome::failed(unexpected(cause), true)
            }
        }
    }

    async fn run(&self, input: &SubmissionInput, network_identifier: &str) -> SubmissionOutcome {
        transition(PipelineState::Idle);

        transition(PipelineState::Probing);
        let probe = self.test_connection().await;
        if !probe.success {
            return finish(SubmissionOutcome::failed(probe_failed(probe.error), true));
        }

        transition(PipelineState::CheckingRateLimit);
        let identity = identity_hash(network_identifier);
        if !self.limiter.check(&identity).await {
            debug!(identity = %identity, "local rate limit reached");
            return finish(SubmissionOutcome::failed(
                rate_limited(self.limiter.window()),
                false,
            ));
        }

        let submission = NormalizedSubmission::build(input, identity, &self.config.origin);

        transition(PipelineState::Submitting);
        let mut attempt: u32 = 0;
        loop {
            match self.store.insert(submission.row()).await {
                Ok(()) => {
                    self.limiter.record_success(submission.identity_hash()).await;
                    info!(
                        content_hash = %submission.content_hash(),
                        attempt,
                        "submission accepted"
                    );
                    return finish(SubmissionOutcome::accepted());
                }
                Err(err) => {
                    let classified = classify(&err);
                    let attempts_remain = attempt < self.config.max_retries;
                    warn!(
                        attempt,
                        kind = %classified.kind,
                        error = %err,
                        "submission attempt failed"
                    );

                    if attempts_remain && classified.kind.is_transient() {
                        let delay = backoff_delay(attempt, self.config.retry_base_delay);
                        debug!(attempt, delay = ?delay, "retrying submission");
                        tokio::time::sleep(delay).await;
                        attempt = attempt.saturating_add(1);
                        continue;
                    }

                    return finish(SubmissionOutcome::failed(classified, attempts_remain));
                }
            }
        }
    }
}

fn transition(state: PipelineState) {
    debug!(state = %state, "submission pipeline transition");
}

fn finish(outcome: SubmissionOutcome) -> SubmissionOutcome {
    let state = if outcome.accepted {
        PipelineState::Accepted
    } else {
        PipelineState::Failed {
            retryable: outcome.retryable,
        }
    };
    transition(state);
    outcome
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic with non-string payload".to_owned())
}
