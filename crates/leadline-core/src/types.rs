//! Submission data types.

use std::fmt;

use leadline_store::SubmissionRow;
use serde::{Deserialize, Serialize};

use crate::error::{ClassifiedError, ValidationError};
use crate::fingerprint::fingerprint;
use crate::validation::{format_contact_number, sanitize_text};

/// Raw form fields as the caller collected them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmissionInput {
    /// Phone-like string in any format.
    pub contact_number: String,
    /// Business category label.
    pub domain: String,
    /// Platform labels, possibly empty.
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Description of the lead's biggest challenge.
    pub pain_point: String,
    /// Whether the lead agreed to marketing contact.
    pub marketing_consent: bool,
}

/// Sanitized, reformatted and fingerprinted submission.
///
/// Built once per submission and never modified; every retry sends the same
/// row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSubmission {
    row: SubmissionRow,
}

impl NormalizedSubmission {
    /// Normalize `input` for the identity `identity_hash`, tagged with
    /// `origin`.
    #[must_use]
    pub fn build(input: &SubmissionInput, identity_hash: String, origin: &str) -> Self {
        let contact_number = format_contact_number(&sanitize_text(&input.contact_number));
        let domain = sanitize_text(&input.domain);
        let pain_point = sanitize_text(&input.pain_point);
        let platforms = input
            .platforms
            .iter()
            .map(|p| sanitize_text(p))
            .filter(|p| !p.is_empty())
            .collect();
        let content_hash = fingerprint(&contact_number, &domain, &pain_point);

        Self {
            row: SubmissionRow {
                contact_number,
                domain,
                platforms,
                pain_point,
                marketing_consent: input.marketing_consent,
                identity_hash,
                origin: origin.to_owned(),
                content_hash,
            },
        }
    }

    /// The row sent to the store.
    #[must_use]
    pub fn row(&self) -> &SubmissionRow {
        &self.row
    }

    #[must_use]
    pub fn contact_number(&self) -> &str {
        &self.row.contact_number
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.row.domain
    }

    #[must_use]
    pub fn platforms(&self) -> &[String] {
        &self.row.platforms
    }

    #[must_use]
    pub fn pain_point(&self) -> &str {
        &self.row.pain_point
    }

    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.row.content_hash
    }

    #[must_use]
    pub fn identity_hash(&self) -> &str {
        &self.row.identity_hash
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.row.origin
    }
}

/// Result of one `submit_form_data` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionOutcome {
    /// Whether the store accepted the submission.
    pub accepted: bool,
    /// Present iff `accepted` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ClassifiedError>,
    /// Whether trying again may help.
    pub retryable: bool,
}

impl SubmissionOutcome {
    #[must_use]
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            error: None,
            retryable: false,
        }
    }

    #[must_use]
    pub fn failed(error: ClassifiedError, retryable: bool) -> Self {
        Self {
            accepted: false,
            error: Some(error),
            retryable,
        }
    }

    /// Rejected by local form validation; never retryable as-is.
    #[must_use]
    pub fn invalid(err: &ValidationError) -> Self {
        Self::failed(ClassifiedError::from(err), false)
    }
}

/// Result of the connectivity probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConnectionStatus {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Stages a submission moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Probing,
    CheckingRateLimit,
    Submitting,
    Accepted,
    Failed { retryable: bool },
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Probing => f.write_str("probing"),
            Self::CheckingRateLimit => f.write_str("checking_rate_limit"),
            Self::Submitting => f.write_str("submitting"),
            Self::Accepted => f.write_str("accepted"),
            Self::Failed { retryable: true } => f.write_str("failed(retryable)"),
            Self::Failed { retryable: false } => f.write_str("failed(terminal)"),
        }
    }
}
