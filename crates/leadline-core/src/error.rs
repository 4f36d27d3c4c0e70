//! Error types for `leadline-core`.
//!
//! [`ValidationError`] covers local form rules checked before any network
//! call. [`ClassifiedError`] is the user-safe description of any failed
//! submission: a taxonomy tag, a fixed message, and an optional diagnostic
//! cause that is never displayed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Local form validation failures. The display text is user-facing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// No contact number was entered.
    #[error("WhatsApp number is required")]
    MissingContactNumber,

    /// The contact number is not a plausible mobile or international number.
    #[error("Please enter valid WhatsApp number")]
    InvalidContactNumber,

    /// No business domain was selected.
    #[error("Please select your business domain")]
    MissingDomain,

    /// The pain point was left empty.
    #[error("Please describe your biggest challenge")]
    MissingPainPoint,

    /// The pain point is shorter than the minimum.
    #[error("Please provide at least {min} characters")]
    PainPointTooShort { len: usize, min: usize },

    /// The pain point is longer than the maximum.
    #[error("Please keep it under {max} characters")]
    PainPointTooLong { len: usize, max: usize },

    /// Marketing consent was not given.
    #[error("Please agree to receive your Blueprint & updates")]
    ConsentRequired,
}

/// Category of a failed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Connectivity or transport failure.
    Network,
    /// Input rejected locally, or a duplicate rejected by the store.
    Validation,
    /// Credential or permission failure.
    Auth,
    /// Local or remote throttling.
    RateLimit,
    /// The store failed on its side.
    Server,
    /// Anything unclassified.
    Unknown,
}

impl ErrorKind {
    /// Stable snake-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Validation => "validation",
            Self::Auth => "auth",
            Self::RateLimit => "rate_limit",
            Self::Server => "server",
            Self::Unknown => "unknown",
        }
    }

    /// Kinds the pipeline retries automatically.
    #[must_use]
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Network | Self::Auth)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A taxonomy-tagged, user-safe error.
///
/// `Display` shows only the user-facing message. `cause` is kept for logs
/// and is skipped when serializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ClassifiedError {
    /// Failure category.
    pub kind: ErrorKind,
    /// Fixed, non-technical explanation for the user.
    pub message: String,
    /// Raw diagnostic detail.
    #[serde(skip)]
    pub cause: Option<String>,
}

impl ClassifiedError {
    /// Build an error with a diagnostic cause.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>, cause: Option<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause,
        }
    }
}

impl From<&ValidationError> for ClassifiedError {
    fn from(err: &ValidationError) -> Self {
        Self::new(ErrorKind::Validation, err.to_string(), Some(format!("{err:?}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::RateLimit).unwrap();
        assert_eq!(json, "\"rate_limit\"");
        assert_eq!(ErrorKind::RateLimit.to_string(), "rate_limit");
    }

    #[test]
    fn only_network_and_auth_are_transient() {
        assert!(ErrorKind::Network.is_transient());
        assert!(ErrorKind::Auth.is_transient());
        for kind in [
            ErrorKind::Validation,
            ErrorKind::RateLimit,
            ErrorKind::Server,
            ErrorKind::Unknown,
        ] {
            assert!(!kind.is_transient(), "{kind} should not be transient");
        }
    }

    #[test]
    fn cause_is_hidden_from_display_and_json() {
        let err = ClassifiedError::new(
            ErrorKind::Unknown,
            "Something went wrong.",
            Some("socket hang up at 0xdeadbeef".to_owned()),
        );
        assert_eq!(err.to_string(), "Something went wrong.");

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "unknown");
        assert!(json.get("cause").is_none());
    }

    #[test]
    fn validation_error_converts_with_user_message() {
        let err = ValidationError::PainPointTooShort { len: 10, min: 20 };
        let classified = ClassifiedError::from(&err);
        assert_eq!(classified.kind, ErrorKind::Validation);
        assert_eq!(classified.message, "Please provide at least 20 characters");
    }
}
