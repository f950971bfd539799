#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::policy::UpdatePolicy;

/// A fetch that failed, remembered under the policy in force at the time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureRecord {
    path: String,
    failed_at: DateTime<Utc>,
    policy: UpdatePolicy,
}

impl FailureRecord {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn failed_at(&self) -> DateTime<Utc> {
        self.failed_at
    }

    pub fn policy(&self) -> UpdatePolicy {
        self.policy
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.policy.is_expired(self.failed_at, now)
    }
}

/// Per-source memory of failed fetches, keyed by repository path.
///
/// ## Normative
///
/// - A recorded failure suppresses upstream requests for its path until its policy expires.
/// - An expired record is dropped the first time it is looked at.
/// - A record never outlives a later success for the same path.
#[derive(Debug, Default)]
pub struct FailureCache {
    entries: DashMap<String, FailureRecord>,
}

impl FailureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_failure(&self, path: &str, policy: UpdatePolicy) {
        self.record_failure_at(path, policy, Utc::now());
    }

    pub fn record_failure_at(&self, path: &str, policy: UpdatePolicy, now: DateTime<Utc>) {
        tracing::debug!(path, %policy, "caching failure");
        self.entries.insert(
            path.to_string(),
            FailureRecord {
                path: path.to_string(),
                failed_at: now,
                policy,
            },
        );
    }

    pub fn is_cached_failure(&self, path: &str) -> bool {
        self.is_cached_failure_at(path, Utc::now())
    }

    pub fn is_cached_failure_at(&self, path: &str, now: DateTime<Utc>) -> bool {
        let expired = match self.entries.get(path) {
            None => return false,
            Some(record) => record.is_expired_at(now),
        };
        if expired {
            // Guard is released above; remove_if re-checks against a concurrent refresh.
            self.entries.remove_if(path, |_, record| record.is_expired_at(now));
            return false;
        }
        true
    }

    pub fn clear_failure(&self, path: &str) {
        if self.entries.remove(path).is_some() {
            tracing::trace!(path, "failure cleared");
        }
    }

    pub fn get(&self, path: &str) -> Option<FailureRecord> {
        self.entries.get(path).map(|r| r.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
