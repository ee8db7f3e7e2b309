//! Credit-application submission rate limiter.
//!
//! Caps accepted submissions per applicant identity per rolling one-hour
//! window. The identity key is a one-way hash of normalized contact fields,
//! so no personal data lands in the counter key space. Counters live in a
//! moka cache whose per-entry TTL is refreshed by each accepted submission,
//! and increments go through the cache's atomic entry API, so two
//! simultaneous submissions cannot both observe the same count.

use std::time::Duration;

use moka::sync::Cache;
use sha2::{Digest, Sha256};

/// Accepted submissions allowed per identity per window.
pub const MAX_SUBMISSIONS_PER_WINDOW: u32 = 3;

/// Rolling window length, anchored at the most recent accepted submission.
const WINDOW: Duration = Duration::from_secs(60 * 60);

/// Counter capacity; identities beyond this are evicted LRU-style.
const MAX_TRACKED_IDENTITIES: u64 = 100_000;

/// Per-identity submission counter with expiring entries.
#[derive(Clone)]
pub struct SubmissionLimiter {
    counts: Cache<String, u32>,
}

impl SubmissionLimiter {
    /// Create a limiter with the production one-hour window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_window(WINDOW)
    }

    /// Create a limiter with a custom window (used by tests).
    #[must_use]
    pub fn with_window(window: Duration) -> Self {
        Self {
            counts: Cache::builder()
                .max_capacity(MAX_TRACKED_IDENTITIES)
                .time_to_live(window)
                .build(),
        }
    }

    /// Derive the opaque identity key for an applicant.
    ///
    /// Lower-cases and trims each component before hashing so trivial
    /// variations ("Jane ", "jane") map to the same identity.
    #[must_use]
    pub fn identity_key(email: &str, first_name: &str, last_name: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(email.trim().to_lowercase());
        hasher.update(first_name.trim().to_lowercase());
        hasher.update(last_name.trim().to_lowercase());
        hex::encode(hasher.finalize())
    }

    /// Whether this identity has exhausted its window. A missing counter
    /// counts as zero.
    #[must_use]
    pub fn is_limited(&self, key: &str) -> bool {
        self.counts.get(key).unwrap_or(0) >= MAX_SUBMISSIONS_PER_WINDOW
    }

    /// Record an accepted submission: atomically increment the counter and
    /// refresh its TTL. Call only after a submission has been accepted.
    pub fn record_submission(&self, key: &str) {
        self.counts
            .entry(key.to_owned())
            .and_upsert_with(|existing| existing.map_or(1, |entry| entry.into_value() + 1));
    }
}

impl Default for SubmissionLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_submissions_pass_fourth_rejected() {
        let limiter = SubmissionLimiter::new();
        let key = SubmissionLimiter::identity_key("jane@example.com", "Jane", "Titan");

        for _ in 0..3 {
            assert!(!limiter.is_limited(&key));
            limiter.record_submission(&key);
        }
        assert!(limiter.is_limited(&key));
    }

    #[test]
    fn test_counter_expires_after_window() {
        let limiter = SubmissionLimiter::with_window(Duration::from_millis(50));
        let key = SubmissionLimiter::identity_key("jane@example.com", "Jane", "Titan");

        for _ in 0..3 {
            limiter.record_submission(&key);
        }
        assert!(limiter.is_limited(&key));

        std::thread::sleep(Duration::from_millis(80));
        assert!(!limiter.is_limited(&key));
        limiter.record_submission(&key);
        assert!(!limiter.is_limited(&key));
    }

    #[test]
    fn test_distinct_identities_do_not_interfere() {
        let limiter = SubmissionLimiter::new();
        let jane = SubmissionLimiter::identity_key("jane@example.com", "Jane", "Titan");
        let joe = SubmissionLimiter::identity_key("joe@example.com", "Joe", "Titan");

        for _ in 0..3 {
            limiter.record_submission(&jane);
        }
        assert!(limiter.is_limited(&jane));
        assert!(!limiter.is_limited(&joe));
    }

    #[test]
    fn test_identity_key_normalizes_case_and_whitespace() {
        let a = SubmissionLimiter::identity_key(" Jane@Example.com ", "Jane ", " TITAN");
        let b = SubmissionLimiter::identity_key("jane@example.com", "jane", "titan");
        assert_eq!(a, b);
    }

    #[test]
    fn test_identity_key_hides_personal_data() {
        let key = SubmissionLimiter::identity_key("jane@example.com", "Jane", "Titan");
        assert_eq!(key.len(), 64);
        assert!(!key.contains("jane"));
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
