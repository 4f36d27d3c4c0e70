//! Machine-readable failure codes reported by the hosted store.
//!
//! `PostgREST` forwards `PostgreSQL` `SQLSTATE` values in the `code` field of its
//! error body and uses `PGRST*` codes for its own failures.

/// `unique_violation`: a row with the same unique key already exists.
pub const UNIQUE_VIOLATION: &str = "23505";

/// `insufficient_privilege`: row-level security or grants refused the write.
pub const INSUFFICIENT_PRIVILEGE: &str = "42501";

/// `PostgREST` throttling code surfaced by the hosted gateway.
pub const THROTTLED: &str = "PGRST116";

/// Name of the uniqueness constraint on `submission_hash`.
pub const CONTENT_HASH_CONSTRAINT: &str = "unique_submission_hash";
