//! `PostgREST` / Supabase submission store.
//!
//! Rows are inserted through the REST gateway (`/rest/v1/{table}`) and the
//! session check hits the auth service's public settings endpoint, which
//! validates the API key without reading the submissions table. Every
//! `reqwest` failure and every non-success response is mapped into
//! [`StoreError`] here.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use crate::{StoreError, SubmissionRow, SubmissionStore};

const DEFAULT_TABLE: &str = "use_case_submissions";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`PostgrestStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Anonymous (publishable) API key.
    pub api_key: String,
    /// Submissions table name. Default: `use_case_submissions`.
    pub table: String,
    /// Request timeout. Default: 10 seconds.
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: DEFAULT_TABLE.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl StoreConfig {
    /// Load settings from environment variables.
    ///
    /// - `LEADLINE_STORE_URL` (falls back to `SUPABASE_URL`)
    /// - `LEADLINE_STORE_KEY` (falls back to `SUPABASE_ANON_KEY`)
    /// - `LEADLINE_TABLE`: default `use_case_submissions`
    /// - `LEADLINE_TIMEOUT_SECS`: default `10`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from an arbitrary key lookup, with the same keys and
    /// fallbacks as [`StoreConfig::from_env`].
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).unwrap_or_default();

        let url = first_non_empty(&[&var("LEADLINE_STORE_URL"), &var("SUPABASE_URL")]);

        let api_key = first_non_empty(&[&var("LEADLINE_STORE_KEY"), &var("SUPABASE_ANON_KEY")]);

        let table = first_non_empty(&[&var("LEADLINE_TABLE"), DEFAULT_TABLE]);

        let timeout = lookup("LEADLINE_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        Self {
            url,
            api_key,
            table,
            timeout,
        }
    }
}

/// Submission store backed by a `PostgREST` gateway.
#[derive(Debug, Clone)]
pub struct PostgrestStore {
    base_url: String,
    api_key: String,
    table: String,
    client: reqwest::Client,
}

impl PostgrestStore {
    /// Build a store from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the URL or API key is empty, or if
    /// the HTTP client cannot be constructed.
    pub fn new(cfg: StoreConfig) -> Result<Self, StoreError> {
        if cfg.url.trim().is_empty() {
            return Err(StoreError::Config(
                "missing store URL; set LEADLINE_STORE_URL or SUPABASE_URL".to_owned(),
            ));
        }
        if cfg.api_key.trim().is_empty() {
            return Err(StoreError::Config(
                "missing store API key; set LEADLINE_STORE_KEY or SUPABASE_ANON_KEY".to_owned(),
            ));
        }

        let table = if cfg.table.is_empty() {
            DEFAULT_TABLE.to_owned()
        } else {
            cfg.table
        };

        let timeout = if cfg.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            cfg.timeout
        };

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("leadline/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: cfg.url.trim().trim_end_matches('/').to_owned(),
            api_key: cfg.api_key,
            table,
            client,
        })
    }

    /// Build a store from [`StoreConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Same as [`PostgrestStore::new`].
    pub fn from_env() -> Result<Self, StoreError> {
        Self::new(StoreConfig::from_env())
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url,
            urlencoding::encode(&self.table)
        )
    }

    fn session_url(&self) -> String {
        format!("{}/auth/v1/settings", self.base_url)
    }

    async fn finish(resp: reqwest::Response) -> Result<(), StoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(rejection(status, &body))
    }
}

#[async_trait::async_trait]
impl SubmissionStore for PostgrestStore {
    async fn check_session(&self) -> Result<(), StoreError> {
        let resp = self
            .client
            .get(self.session_url())
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        Self::finish(resp).await
    }

    async fn insert(&self, row: &SubmissionRow) -> Result<(), StoreError> {
        let resp = self
            .client
            .post(self.table_url())
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=minimal")
            .json(&[row])
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let result = Self::finish(resp).await;
        if let Err(ref err) = result {
            tracing::debug!(error = %err, table = %self.table, "insert refused by store");
        }
        result
    }
}

fn transport_error(err: &reqwest::Error) -> StoreError {
    if err.is_connect() {
        StoreError::Offline(err.to_string())
    } else {
        StoreError::Transport(err.to_string())
    }
}

/// Map a non-success response into [`StoreError::Rejected`].
///
/// `PostgREST` bodies carry `{code, message, details, hint}`; the auth service
/// uses `{code: <number>, error_code, msg}`. Unparseable bodies fall back to
/// the HTTP status text.
fn rejection(status: StatusCode, body: &str) -> StoreError {
    let parsed = serde_json::from_str::<Value>(body).unwrap_or(Value::Null);

    let code = ["code", "error_code"]
        .iter()
        .find_map(|k| parsed.get(*k).and_then(Value::as_str))
        .map(str::to_owned);

    let message = ["message", "msg", "error_description", "error"]
        .iter()
        .find_map(|k| parsed.get(*k).and_then(Value::as_str))
        .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned);

    StoreError::Rejected {
        status: status.as_u16(),
        code,
        message,
    }
}

fn first_non_empty(vals: &[&str]) -> String {
    vals.iter()
        .find(|v| !v.is_empty())
        .map(|v| (*v).to_owned())
        .unwrap_or_default()
}
