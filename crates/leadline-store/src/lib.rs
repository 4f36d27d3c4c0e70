//! Remote store abstraction for `leadline`.
//!
//! This crate defines the [`SubmissionStore`] trait: the only thing the
//! submission pipeline knows about the hosted table that lead submissions
//! land in. A store can insert a [`SubmissionRow`] and answer a lightweight
//! session check; every failure is mapped into the typed [`StoreError`] at
//! this boundary so callers never inspect raw wire payloads.
//!
//! Two implementations are provided:
//!
//! - [`PostgrestStore`]: production default, a `PostgREST` / Supabase REST
//!   client backed by `reqwest` (feature `postgrest-backend`)
//! - [`MemoryStore`]: in-memory, enforces the fingerprint uniqueness
//!   constraint; for tests and dry runs

pub mod codes;
mod error;
mod memory;
#[cfg(feature = "postgrest-backend")]
mod postgrest;
mod row;

pub use error::StoreError;
pub use memory::MemoryStore;
#[cfg(feature = "postgrest-backend")]
pub use postgrest::{PostgrestStore, StoreConfig};
pub use row::SubmissionRow;

/// An insert-capable remote table for lead submissions.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
/// The store is expected to reject a second row carrying the same
/// `submission_hash` with a [`codes::UNIQUE_VIOLATION`] error naming
/// [`codes::CONTENT_HASH_CONSTRAINT`].
#[async_trait::async_trait]
pub trait SubmissionStore: Send + Sync + 'static {
    /// Confirm the store is reachable and the credentials are accepted,
    /// without touching the submissions table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Offline`] or [`StoreError::Transport`] when the
    /// store cannot be reached, and [`StoreError::Rejected`] when it answers
    /// with a failure status.
    async fn check_session(&self) -> Result<(), StoreError>;

    /// Insert a single submission row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] with the store's machine-readable
    /// code when the row is refused (duplicate fingerprint, permissions,
    /// throttling), or a transport-level variant when the request never
    /// completed.
    async fn insert(&self, row: &SubmissionRow) -> Result<(), StoreError>;
}
