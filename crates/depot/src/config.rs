#![forbid(unsafe_code)]

//! Configuration for [`Depot`](crate::Depot).

use std::{collections::HashSet, fs, num::NonZeroUsize, path::{Path, PathBuf}};

use depot_proxy::{ChecksumPolicy, UpdatePolicy};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DepotError, DepotResult};

fn default_true() -> bool {
    true
}

fn default_release_policy() -> UpdatePolicy {
    UpdatePolicy::Never
}

fn default_snapshot_policy() -> UpdatePolicy {
    UpdatePolicy::daily()
}

/// Managed repository and the remote repositories it proxies.
///
/// # Example
///
/// ```ignore
/// let config = DepotConfig::from_json_str(r#"{
///     "id": "internal",
///     "root": "/srv/depot/internal",
///     "remotes": [
///         { "id": "mirror", "url": "file:///srv/mirror/", "snapshot_policy": "interval:30" }
///     ]
/// }"#)?;
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepotConfig {
    /// Repository id, used in logs and errors.
    pub id: String,
    /// Directory holding the repository.
    pub root: PathBuf,
    /// Item cache capacity; the content default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_capacity: Option<NonZeroUsize>,
    /// Serve a local copy flagged stale when no remote can refresh it.
    #[serde(default = "default_true")]
    pub stale_fallback: bool,
    /// Remote repositories, consulted in order.
    #[serde(default)]
    pub remotes: Vec<RemoteConfig>,
}

impl DepotConfig {
    pub fn new(id: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            root: root.into(),
            cache_capacity: None,
            stale_fallback: true,
            remotes: Vec::new(),
        }
    }

    pub fn with_remote(mut self, remote: RemoteConfig) -> Self {
        self.remotes.push(remote);
        self
    }

    pub fn with_cache_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    pub fn with_stale_fallback(mut self, enabled: bool) -> Self {
        self.stale_fallback = enabled;
        self
    }

    pub fn from_json_str(json: &str) -> DepotResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> DepotResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| DepotError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading depot configuration");
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> DepotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Ids must be non-empty; remote ids unique and usable as file name parts.
    pub fn validate(&self) -> DepotResult<()> {
        if self.id.trim().is_empty() {
            return Err(DepotError::Config("repository id is empty".to_string()));
        }
        let mut seen = HashSet::new();
        for remote in &self.remotes {
            let valid = !remote.id.is_empty()
                && remote
                    .id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
            if !valid {
                return Err(DepotError::Config(format!("invalid remote id {:?}", remote.id)));
            }
            if !seen.insert(remote.id.as_str()) {
                return Err(DepotError::Config(format!("duplicate remote id {:?}", remote.id)));
            }
        }
        Ok(())
    }
}

/// One remote repository.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub url: Url,
    /// Abort the whole fetch when this remote fails.
    #[serde(default)]
    pub hard_fail: bool,
    #[serde(default = "default_true")]
    pub cache_failures: bool,
    #[serde(default = "default_release_policy")]
    pub release_policy: UpdatePolicy,
    #[serde(default = "default_snapshot_policy")]
    pub snapshot_policy: UpdatePolicy,
    #[serde(default)]
    pub checksum_policy: ChecksumPolicy,
    /// Glob patterns; when non-empty only matching paths are requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub whitelist: Vec<String>,
    /// Glob patterns never requested from this remote.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blacklist: Vec<String>,
}

impl RemoteConfig {
    pub fn new(id: impl Into<String>, url: Url) -> Self {
        Self {
            id: id.into(),
            name: None,
            url,
            hard_fail: false,
            cache_failures: true,
            release_policy: default_release_policy(),
            snapshot_policy: default_snapshot_policy(),
            checksum_policy: ChecksumPolicy::default(),
            whitelist: Vec::new(),
            blacklist: Vec::new(),
        }
    }

    pub fn with_hard_fail(mut self, hard_fail: bool) -> Self {
        self.hard_fail = hard_fail;
        self
    }

    pub fn with_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.release_policy = policy;
        self.snapshot_policy = policy;
        self
    }

    pub fn with_checksum_policy(mut self, policy: ChecksumPolicy) -> Self {
        self.checksum_policy = policy;
        self
    }

    pub fn with_whitelist(mut self, pattern: impl Into<String>) -> Self {
        self.whitelist.push(pattern.into());
        self
    }

    pub fn with_blacklist(mut self, pattern: impl Into<String>) -> Self {
        self.blacklist.push(pattern.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config = DepotConfig::from_json_str(
            r#"{
                "id": "internal",
                "root": "/srv/depot",
                "remotes": [{ "id": "central", "url": "file:///srv/mirror/" }]
            }"#,
        )
        .unwrap();

        assert!(config.stale_fallback);
        let remote = &config.remotes[0];
        assert!(remote.cache_failures);
        assert!(!remote.hard_fail);
        assert_eq!(remote.release_policy, UpdatePolicy::Never);
        assert_eq!(remote.snapshot_policy, UpdatePolicy::daily());
        assert_eq!(remote.checksum_policy, ChecksumPolicy::Report);
    }

    #[test]
    fn policies_are_read_from_strings() {
        let config = DepotConfig::from_json_str(
            r#"{
                "id": "internal",
                "root": "/srv/depot",
                "remotes": [{
                    "id": "central",
                    "url": "file:///srv/mirror/",
                    "release_policy": "always",
                    "snapshot_policy": "interval:15",
                    "checksum_policy": "fix",
                    "whitelist": ["com/x/**"]
                }]
            }"#,
        )
        .unwrap();

        let remote = &config.remotes[0];
        assert_eq!(remote.release_policy, UpdatePolicy::Always);
        assert_eq!(remote.snapshot_policy, UpdatePolicy::minutes(15));
        assert_eq!(remote.checksum_policy, ChecksumPolicy::Fix);
        assert_eq!(remote.whitelist, ["com/x/**"]);
    }

    #[rstest]
    #[case(r#"{"id": "", "root": "/r"}"#)]
    #[case(r#"{"id": "a", "root": "/r", "unknown": 1}"#)]
    #[case(r#"{"id": "a", "root": "/r", "remotes": [{"id": "x", "url": "file:///a/"}, {"id": "x", "url": "file:///b/"}]}"#)]
    #[case(r#"{"id": "a", "root": "/r", "remotes": [{"id": "x/y", "url": "file:///a/"}]}"#)]
    #[case(r#"{"id": "a", "root": "/r", "remotes": [{"id": "x", "url": "file:///a/", "release_policy": "sometimes"}]}"#)]
    fn test_invalid_config(#[case] json: &str) {
        assert!(DepotConfig::from_json_str(json).is_err());
    }

    #[test]
    fn json_round_trip() {
        let url = Url::parse("file:///srv/mirror/").unwrap();
        let config = DepotConfig::new("internal", "/srv/depot").with_remote(
            RemoteConfig::new("central", url)
                .with_update_policy(UpdatePolicy::hourly())
                .with_blacklist("**/internal/**"),
        );
        let json = config.to_json().unwrap();
        assert_eq!(DepotConfig::from_json_str(&json).unwrap(), config);
    }
}
