//! Mapping from store failures to [`ClassifiedError`].
//!
//! Rules are checked in a fixed priority order; the first match decides the
//! kind. Messages are fixed per rule and never include the raw failure.

use std::time::Duration;

use leadline_store::StoreError;
use leadline_store::codes::{
    CONTENT_HASH_CONSTRAINT, INSUFFICIENT_PRIVILEGE, THROTTLED, UNIQUE_VIOLATION,
};

use crate::error::{ClassifiedError, ErrorKind};

const OFFLINE_MESSAGE: &str = "No internet connection. Please check your network and try again.";
const DUPLICATE_MESSAGE: &str = "We've already received this submission. Feel free to share a different business challenge instead.";
const AUTH_MESSAGE: &str = "Authentication error. Please refresh the page and try again.";
const THROTTLED_MESSAGE: &str = "Too many submissions. Please wait a few minutes before trying again.";
const CONNECTION_FAILED_MESSAGE: &str = "Connection failed. Please check your internet and try again.";
const SERVER_MESSAGE: &str = "Our servers are having trouble right now. Please try again shortly.";
const UNKNOWN_MESSAGE: &str = "Something went wrong. Please try again or contact support.";
const PROBE_FAILED_MESSAGE: &str = "Unable to connect to our servers. Please refresh the page and try again.";
const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Classify a store failure.
///
/// Priority:
/// 1. store unreachable → `network`
/// 2. unique violation on the content fingerprint → `validation`
/// 3. insufficient privilege, "permission denied", HTTP 401/403 → `auth`
/// 4. throttling code, "rate limit", HTTP 429 → `rate_limit`
/// 5. transport failure → `network`
/// 6. HTTP 5xx → `server`
/// 7. anything else → `unknown`
#[must_use]
pub fn classify(err: &StoreError) -> ClassifiedError {
    let cause = Some(err.to_string());
    let (kind, message) = match err {
        StoreError::Offline(_) => (ErrorKind::Network, OFFLINE_MESSAGE),
        StoreError::Rejected {
            status,
            code,
            message,
        } => classify_rejection(*status, code.as_deref(), message),
        StoreError::Transport(_) => (ErrorKind::Network, CONNECTION_FAILED_MESSAGE),
        StoreError::Config(_) => (ErrorKind::Unknown, UNKNOWN_MESSAGE),
    };
    ClassifiedError::new(kind, message, cause)
}

fn classify_rejection(status: u16, code: Option<&str>, message: &str) -> (ErrorKind, &'static str) {
    let lowered = message.to_lowercase();

    if code == Some(UNIQUE_VIOLATION) && message.contains(CONTENT_HASH_CONSTRAINT) {
        return (ErrorKind::Validation, DUPLICATE_MESSAGE);
    }

    if code == Some(INSUFFICIENT_PRIVILEGE)
        || lowered.contains("permission denied")
        || matches!(status, 401 | 403)
    {
        return (ErrorKind::Auth, AUTH_MESSAGE);
    }

    if code == Some(THROTTLED) || lowered.contains("rate limit") || status == 429 {
        return (ErrorKind::RateLimit, THROTTLED_MESSAGE);
    }

    if (500..600).contains(&status) {
        return (ErrorKind::Server, SERVER_MESSAGE);
    }

    (ErrorKind::Unknown, UNKNOWN_MESSAGE)
}

/// The connectivity probe failed before the first attempt.
#[must_use]
pub fn probe_failed(cause: Option<String>) -> ClassifiedError {
    ClassifiedError::new(ErrorKind::Auth, PROBE_FAILED_MESSAGE, cause)
}

/// The local rate limiter refused the submission.
#[must_use]
pub fn rate_limited(window: Duration) -> ClassifiedError {
    let minutes = (window.as_secs() / 60).max(1);
    let unit = if minutes == 1 { "minute" } else { "minutes" };
    ClassifiedError::new(
        ErrorKind::RateLimit,
        format!("You've submitted too many requests. Please wait {minutes} {unit} before trying again."),
        None,
    )
}

/// Something inside the pipeline panicked.
#[must_use]
pub fn unexpected(cause: String) -> ClassifiedError {
    ClassifiedError::new(ErrorKind::Unknown, UNEXPECTED_MESSAGE, Some(cause))
}
