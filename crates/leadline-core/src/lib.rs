//! Core library for `leadline`.
//!
//! Contains the lead-capture submission pipeline and everything it leans on:
//! form validation and contact-number normalization, content fingerprints and
//! identity hashes, the advisory rate limiter, the error taxonomy with its
//! classifier, and pipeline configuration. This crate depends on
//! `leadline-store` for the store trait and knows nothing about HTTP.

pub mod classify;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod pipeline;
pub mod rate_limit;
pub mod types;
pub mod validation;

pub use config::PipelineConfig;
pub use error::{ClassifiedError, ErrorKind, ValidationError};
pub use pipeline::{DEFAULT_NETWORK_IDENTIFIER, MISSING_STORE_CONFIGURATION, SubmissionPipeline};
pub use rate_limit::RateLimiter;
pub use types::{
    ConnectionStatus, NormalizedSubmission, PipelineState, SubmissionInput, SubmissionOutcome,
};
