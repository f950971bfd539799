#![forbid(unsafe_code)]

use std::{fmt, sync::Arc};

use depot_core::is_snapshot;

use crate::{
    failures::FailureCache,
    pattern::PathPattern,
    policy::{ChecksumPolicy, UpdatePolicy},
    remote::Remote,
};

/// One upstream repository consulted by the fetcher, in configured order.
///
/// ## Normative
///
/// - A non-empty whitelist admits only matching paths; a blacklist match always excludes.
/// - The snapshot update policy applies when the path's parent directory is a snapshot
///   version, the release policy otherwise.
/// - The failure cache belongs to the source and is never shared.
pub struct ProxiedSource {
    id: String,
    name: String,
    remote: Arc<dyn Remote>,
    hard_fail: bool,
    cache_failures: bool,
    release_policy: UpdatePolicy,
    snapshot_policy: UpdatePolicy,
    checksum_policy: ChecksumPolicy,
    whitelist: Vec<PathPattern>,
    blacklist: Vec<PathPattern>,
    failures: FailureCache,
}

impl ProxiedSource {
    pub fn new(id: impl Into<String>, remote: Arc<dyn Remote>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            remote,
            hard_fail: false,
            cache_failures: true,
            release_policy: UpdatePolicy::Never,
            snapshot_policy: UpdatePolicy::daily(),
            checksum_policy: ChecksumPolicy::default(),
            whitelist: Vec::new(),
            blacklist: Vec::new(),
            failures: FailureCache::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_hard_fail(mut self, hard_fail: bool) -> Self {
        self.hard_fail = hard_fail;
        self
    }

    pub fn with_cache_failures(mut self, cache_failures: bool) -> Self {
        self.cache_failures = cache_failures;
        self
    }

    pub fn with_release_policy(mut self, policy: UpdatePolicy) -> Self {
        self.release_policy = policy;
        self
    }

    pub fn with_snapshot_policy(mut self, policy: UpdatePolicy) -> Self {
        self.snapshot_policy = policy;
        self
    }

    /// Same update policy for releases and snapshots.
    pub fn with_update_policy(self, policy: UpdatePolicy) -> Self {
        self.with_release_policy(policy).with_snapshot_policy(policy)
    }

    pub fn with_checksum_policy(mut self, policy: ChecksumPolicy) -> Self {
        self.checksum_policy = policy;
        self
    }

    pub fn with_whitelist(mut self, patterns: impl IntoIterator<Item = PathPattern>) -> Self {
        self.whitelist.extend(patterns);
        self
    }

    pub fn with_blacklist(mut self, patterns: impl IntoIterator<Item = PathPattern>) -> Self {
        self.blacklist.extend(patterns);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn remote(&self) -> &dyn Remote {
        self.remote.as_ref()
    }

    pub fn hard_fail(&self) -> bool {
        self.hard_fail
    }

    pub fn cache_failures(&self) -> bool {
        self.cache_failures
    }

    pub fn checksum_policy(&self) -> ChecksumPolicy {
        self.checksum_policy
    }

    pub fn failures(&self) -> &FailureCache {
        &self.failures
    }

    pub fn allows(&self, path: &str) -> bool {
        let path = path.trim_start_matches('/');
        if self.blacklist.iter().any(|p| p.matches(path)) {
            return false;
        }
        self.whitelist.is_empty() || self.whitelist.iter().any(|p| p.matches(path))
    }

    pub fn policy_for(&self, path: &str) -> UpdatePolicy {
        let mut segments = path.trim_matches('/').rsplit('/');
        segments.next();
        match segments.next() {
            Some(dir) if is_snapshot(dir) => self.snapshot_policy,
            _ => self.release_policy,
        }
    }
}

impl fmt::Debug for ProxiedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxiedSource")
            .field("id", &self.id)
            .field("hard_fail", &self.hard_fail)
            .field("cache_failures", &self.cache_failures)
            .field("release_policy", &self.release_policy)
            .field("snapshot_policy", &self.snapshot_policy)
            .field("checksum_policy", &self.checksum_policy)
            .finish_non_exhaustive()
    }
}
