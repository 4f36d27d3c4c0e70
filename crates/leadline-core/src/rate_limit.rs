//! Advisory client-side submission throttle.
//!
//! Counts successful submissions per identity hash inside a fixed window.
//! Missing or expired entries always allow, so this never blocks a first
//! submission and is not a security control; the store enforces the real
//! limits. State lives only in process memory.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

/// Default length of a counting window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Default number of submissions allowed per window.
pub const DEFAULT_MAX_SUBMISSIONS: u32 = 5;

#[derive(Debug, Clone, Copy)]
struct RateEntry {
    count: u32,
    window_start: Instant,
}

/// Per-identity submission counter.
///
/// Cheap to clone; clones share the same counters. Construct one per process
/// (or per test) and hand it to the pipeline.
///
/// [`check`](Self::check) and [`record_success`](Self::record_success) lock
/// separately and the pipeline inserts in between, so overlapping submissions
/// from one identity can all pass `check` and push the count past the
/// maximum. Every success is still counted, and the next `check` refuses.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    entries: Arc<RwLock<HashMap<String, RateEntry>>>,
    window: Duration,
    max_submissions: u32,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_MAX_SUBMISSIONS)
    }
}

impl RateLimiter {
    /// Create an empty limiter.
    #[must_use]
    pub fn new(window: Duration, max_submissions: u32) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            window,
            max_submissions,
        }
    }

    /// Length of the counting window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    fn is_live(&self, entry: &RateEntry, now: Instant) -> bool {
        now.duration_since(entry.window_start) < self.window
    }

    /// Whether `identity` may submit now.
    pub async fn check(&self, identity: &str) -> bool {
        let now = Instant::now();
        let entries = self.entries.read().await;
        match entries.get(identity) {
            Some(entry) if self.is_live(entry, now) => entry.count < self.max_submissions,
            _ => true,
        }
    }

    /// Count one successful submission for `identity`.
    ///
    /// A live entry is incremented; a missing or expired one starts a new
    /// window at one.
    pub async fn record_success(&self, identity: &str) {
        let now = Instant::now();
        let fresh = RateEntry {
            count: 0,
            window_start: now,
        };
        let mut entries = self.entries.write().await;
        let entry = entries.entry(identity.to_owned()).or_insert(fresh);
        if !self.is_live(entry, now) {
            *entry = fresh;
        }
        entry.count = entry.count.saturating_add(1);
    }

    /// Submissions counted for `identity` in its current window.
    pub async fn count(&self, identity: &str) -> u32 {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries
            .get(identity)
            .filter(|entry| self.is_live(entry, now))
            .map_or(0, |entry| entry.count)
    }
}
