//! Error types for store operations.

/// Wire-level failures from a [`SubmissionStore`](crate::SubmissionStore).
///
/// Adapters translate whatever their transport produces into one of these
/// variants; classification into user-facing categories happens above this
/// layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached at all (DNS failure, refused
    /// connection, no route).
    #[error("store unreachable: {0}")]
    Offline(String),

    /// The store answered and refused the request.
    #[error(
        "store rejected request with HTTP {status} (code {}): {message}",
        .code.as_deref().unwrap_or("none")
    )]
    Rejected {
        /// HTTP status code of the response.
        status: u16,
        /// Machine-readable error code from the response body, if any.
        code: Option<String>,
        /// Error message from the response body.
        message: String,
    },

    /// The request failed in the transport layer after a connection was
    /// possible (timeout, reset, unreadable body).
    #[error("store transport error: {0}")]
    Transport(String),

    /// The store is missing required configuration.
    #[error("store config error: {0}")]
    Config(String),
}

impl StoreError {
    /// Build a [`StoreError::Rejected`].
    #[must_use]
    pub fn rejected(status: u16, code: Option<&str>, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            code: code.map(str::to_owned),
            message: message.into(),
        }
    }

    /// The error code carried by a rejection, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Rejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejected_display_includes_code_and_status() {
        let err = StoreError::rejected(409, Some("23505"), "duplicate key");
        assert_eq!(
            err.to_string(),
            "store rejected request with HTTP 409 (code 23505): duplicate key"
        );
        assert_eq!(err.code(), Some("23505"));
    }

    #[test]
    fn rejected_without_code_says_none() {
        let err = StoreError::rejected(500, None, "boom");
        assert!(err.to_string().contains("(code none)"));
        assert_eq!(err.code(), None);
    }

    #[test]
    fn non_rejection_has_no_code() {
        assert_eq!(StoreError::Offline("dns".to_owned()).code(), None);
    }
}
