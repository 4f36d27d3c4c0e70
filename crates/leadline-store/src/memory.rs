//! In-memory submission store for testing and dry runs.
//!
//! Rows live in a `BTreeMap` keyed by content fingerprint behind a `RwLock`.
//! Nothing is persisted. The map key doubles as the uniqueness constraint, so
//! duplicates are refused with the same code and constraint name the hosted
//! table reports.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::codes::{CONTENT_HASH_CONSTRAINT, UNIQUE_VIOLATION};
use crate::{StoreError, SubmissionRow, SubmissionStore};

/// An in-memory store that enforces fingerprint uniqueness.
///
/// Clones share the same underlying rows.
///
/// # Examples
///
/// ```
/// # use leadline_store::{MemoryStore, SubmissionStore};
/// # #[tokio::main]
/// # async fn main() {
/// let store = MemoryStore::new();
/// store.check_session().await.unwrap();
/// assert!(store.is_empty().await);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Arc<RwLock<BTreeMap<String, SubmissionRow>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored rows, ordered by fingerprint.
    pub async fn rows(&self) -> Vec<SubmissionRow> {
        self.rows.read().await.values().cloned().collect()
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Whether no row has been stored yet.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl SubmissionStore for MemoryStore {
    async fn check_session(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert(&self, row: &SubmissionRow) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&row.content_hash) {
            return Err(StoreError::rejected(
                409,
                Some(UNIQUE_VIOLATION),
                format!("duplicate key value violates unique constraint \"{CONTENT_HASH_CONSTRAINT}\""),
            ));
        }
        rows.insert(row.content_hash.clone(), row.clone());
        Ok(())
    }
}
