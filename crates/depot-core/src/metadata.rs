#![forbid(unsafe_code)]

//! `maven-metadata.xml` reader, writer and merge.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{
    error::{MetadataError, MetadataResult},
    version::{compare_versions, is_snapshot, release_part, SnapshotVersion},
};

/// Repository metadata document, either project level (version list) or version level
/// (snapshot information).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "metadata", rename_all = "camelCase")]
pub struct RepositoryMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versioning: Option<Versioning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Plugins>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Versioning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Snapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions: Option<Versions>,
    /// `yyyyMMddHHmmss`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_versions: Option<SnapshotVersions>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// `yyyyMMdd.HHmmss`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_copy: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versions {
    #[serde(default)]
    pub version: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotVersions {
    #[serde(default)]
    pub snapshot_version: Vec<SnapshotVersionEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotVersionEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugins {
    #[serde(default)]
    pub plugin: Vec<Plugin>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plugin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,
}

impl RepositoryMetadata {
    pub fn from_xml(xml: &str) -> MetadataResult<Self> {
        quick_xml::de::from_str(xml).map_err(|e| MetadataError::Parse(e.to_string()))
    }

    pub fn from_slice(bytes: &[u8]) -> MetadataResult<Self> {
        Self::from_xml(std::str::from_utf8(bytes)?)
    }

    /// Serialize with an XML declaration and two-space indentation.
    pub fn to_xml(&self) -> MetadataResult<String> {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let mut ser = quick_xml::se::Serializer::new(&mut out);
        ser.indent(' ', 2);
        self.serialize(ser)
            .map_err(|e| MetadataError::Serialize(e.to_string()))?;
        out.push('\n');
        Ok(out)
    }

    /// Snapshot recorded in a version-level document, if it has both timestamp and build.
    ///
    /// The base is taken from `version` (the generic snapshot label) when present.
    pub fn snapshot_version(&self) -> Option<SnapshotVersion> {
        let snapshot = self.versioning.as_ref()?.snapshot.as_ref()?;
        let timestamp = snapshot.timestamp.as_deref().filter(|t| !t.is_empty())?;
        let build = snapshot.build_number?;
        let base = self.version.as_deref().map(release_part).unwrap_or_default();
        Some(SnapshotVersion::new(base, timestamp, build))
    }

    /// Listed versions, in document order.
    pub fn versions(&self) -> &[String] {
        self.versioning
            .as_ref()
            .and_then(|v| v.versions.as_ref())
            .map_or(&[], |v| v.version.as_slice())
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.versioning.as_ref()?.last_updated.as_deref()
    }

    /// Fold `other` into `self`.
    ///
    /// Versions are unioned and sorted, `latest` and `release` recomputed from the union, the
    /// most specific snapshot kept, the newest `lastUpdated` kept, snapshot versions and plugins
    /// unioned. Identity fields are only filled in when missing.
    pub fn merge(&mut self, other: &RepositoryMetadata) {
        if self.group_id.is_none() {
            self.group_id.clone_from(&other.group_id);
        }
        if self.artifact_id.is_none() {
            self.artifact_id.clone_from(&other.artifact_id);
        }
        if self.version.is_none() {
            self.version.clone_from(&other.version);
        }

        if let Some(theirs) = &other.versioning {
            let ours = self.versioning.get_or_insert_with(Versioning::default);
            ours.merge(theirs);
        }

        if let Some(theirs) = &other.plugins {
            let ours = self.plugins.get_or_insert_with(Plugins::default);
            for plugin in &theirs.plugin {
                let known = ours.plugin.iter().any(|p| p.prefix == plugin.prefix);
                if !known {
                    ours.plugin.push(plugin.clone());
                }
            }
        }
    }
}

impl Versioning {
    fn merge(&mut self, other: &Versioning) {
        let mut versions: Vec<String> = self
            .versions
            .as_ref()
            .map(|v| v.version.clone())
            .unwrap_or_default();
        for v in other.versions.iter().flat_map(|v| &v.version) {
            if !versions.contains(v) {
                versions.push(v.clone());
            }
        }
        versions.sort_by(|a, b| compare_versions(a, b));

        let latest = [self.latest.as_deref(), other.latest.as_deref()]
            .into_iter()
            .flatten()
            .chain(versions.iter().map(String::as_str))
            .max_by(|a, b| compare_versions(a, b))
            .map(str::to_string);
        let release = [self.release.as_deref(), other.release.as_deref()]
            .into_iter()
            .flatten()
            .chain(versions.iter().map(String::as_str).filter(|v| !is_snapshot(v)))
            .max_by(|a, b| compare_versions(a, b))
            .map(str::to_string);

        self.latest = latest;
        self.release = release;
        if !versions.is_empty() {
            self.versions = Some(Versions { version: versions });
        }

        self.snapshot = match (self.snapshot.take(), &other.snapshot) {
            (Some(a), Some(b)) => Some(most_specific_snapshot(a, b.clone())),
            (a, b) => a.or_else(|| b.clone()),
        };

        self.last_updated = match (self.last_updated.take(), &other.last_updated) {
            (Some(a), Some(b)) => Some(if b.as_str() > a.as_str() { b.clone() } else { a }),
            (a, b) => a.or_else(|| b.clone()),
        };

        if let Some(theirs) = &other.snapshot_versions {
            let ours = self
                .snapshot_versions
                .get_or_insert_with(SnapshotVersions::default);
            for entry in &theirs.snapshot_version {
                let existing = ours
                    .snapshot_version
                    .iter_mut()
                    .find(|e| e.classifier == entry.classifier && e.extension == entry.extension);
                match existing {
                    Some(e) if entry.updated > e.updated => *e = entry.clone(),
                    Some(_) => {}
                    None => ours.snapshot_version.push(entry.clone()),
                }
            }
        }
    }
}

/// A snapshot with a timestamp beats a local-copy marker; otherwise the newer
/// (timestamp, build) wins.
fn most_specific_snapshot(a: Snapshot, b: Snapshot) -> Snapshot {
    let key = |s: &Snapshot| (s.timestamp.clone(), s.build_number.unwrap_or(0));
    match (a.timestamp.is_some(), b.timestamp.is_some()) {
        (true, false) => a,
        (false, true) => b,
        _ => match key(&a).cmp(&key(&b)) {
            Ordering::Less => b,
            _ => a,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERSION_LEVEL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>com.x</groupId>
  <artifactId>lib</artifactId>
  <version>1.0-SNAPSHOT</version>
  <versioning>
    <snapshot>
      <timestamp>20230102.080000</timestamp>
      <buildNumber>1</buildNumber>
    </snapshot>
    <lastUpdated>20230102080000</lastUpdated>
    <snapshotVersions>
      <snapshotVersion>
        <extension>jar</extension>
        <value>1.0-20230102.080000-1</value>
        <updated>20230102080000</updated>
      </snapshotVersion>
    </snapshotVersions>
  </versioning>
</metadata>
"#;

    fn project_level(versions: &[&str], last_updated: &str) -> RepositoryMetadata {
        RepositoryMetadata {
            group_id: Some("com.x".into()),
            artifact_id: Some("lib".into()),
            version: None,
            versioning: Some(Versioning {
                versions: Some(Versions {
                    version: versions.iter().map(|v| v.to_string()).collect(),
                }),
                last_updated: Some(last_updated.into()),
                ..Versioning::default()
            }),
            plugins: None,
        }
    }

    #[test]
    fn reads_snapshot_information() {
        let md = RepositoryMetadata::from_xml(VERSION_LEVEL).unwrap();
        let snapshot = md.snapshot_version().unwrap();
        assert_eq!(snapshot.to_string(), "1.0-20230102.080000-1");
        assert_eq!(md.last_updated(), Some("20230102080000"));
        let entries = &md
            .versioning
            .as_ref()
            .unwrap()
            .snapshot_versions
            .as_ref()
            .unwrap()
            .snapshot_version;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].value.as_deref(), Some("1.0-20230102.080000-1"));
    }

    #[test]
    fn missing_build_number_is_not_a_snapshot() {
        let xml = "<metadata><version>1.0-SNAPSHOT</version><versioning><snapshot>\
                   <localCopy>true</localCopy></snapshot></versioning></metadata>";
        let md = RepositoryMetadata::from_xml(xml).unwrap();
        assert!(md.snapshot_version().is_none());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = RepositoryMetadata::from_xml("<metadata><versioning>").unwrap_err();
        assert!(matches!(err, MetadataError::Parse(_)));
        assert!(matches!(
            RepositoryMetadata::from_slice(&[0xff, 0xfe]),
            Err(MetadataError::Utf8(_))
        ));
    }

    #[test]
    fn written_document_reads_back() {
        let md = RepositoryMetadata::from_xml(VERSION_LEVEL).unwrap();
        let xml = md.to_xml().unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<buildNumber>1</buildNumber>"));
        assert_eq!(RepositoryMetadata::from_xml(&xml).unwrap(), md);
    }

    #[test]
    fn merge_unions_versions_and_keeps_newest_timestamp() {
        let mut a = project_level(&["1.0", "1.2"], "20230101000000");
        let b = project_level(&["1.1", "1.2", "2.0-SNAPSHOT"], "20230105000000");
        a.merge(&b);

        assert_eq!(a.versions(), ["1.0", "1.1", "1.2", "2.0-SNAPSHOT"]);
        let versioning = a.versioning.as_ref().unwrap();
        assert_eq!(versioning.latest.as_deref(), Some("2.0-SNAPSHOT"));
        assert_eq!(versioning.release.as_deref(), Some("1.2"));
        assert_eq!(a.last_updated(), Some("20230105000000"));
    }

    #[test]
    fn merge_prefers_most_specific_snapshot() {
        let mut local = RepositoryMetadata {
            version: Some("1.0-SNAPSHOT".into()),
            versioning: Some(Versioning {
                snapshot: Some(Snapshot {
                    local_copy: Some(true),
                    ..Snapshot::default()
                }),
                ..Versioning::default()
            }),
            ..RepositoryMetadata::default()
        };
        let older = RepositoryMetadata {
            version: Some("1.0-SNAPSHOT".into()),
            versioning: Some(Versioning {
                snapshot: Some(Snapshot {
                    timestamp: Some("20230101.120000".into()),
                    build_number: Some(3),
                    local_copy: None,
                }),
                ..Versioning::default()
            }),
            ..RepositoryMetadata::default()
        };
        let newer = RepositoryMetadata::from_xml(VERSION_LEVEL).unwrap();

        local.merge(&older);
        local.merge(&newer);
        assert_eq!(
            local.snapshot_version().unwrap().to_string(),
            "1.0-20230102.080000-1"
        );
    }

    #[test]
    fn merge_unions_plugins_by_prefix() {
        let plugin = |prefix: &str| Plugin {
            name: Some(format!("{prefix} plugin")),
            prefix: Some(prefix.into()),
            artifact_id: Some(format!("{prefix}-maven-plugin")),
        };
        let mut a = RepositoryMetadata {
            plugins: Some(Plugins {
                plugin: vec![plugin("compiler")],
            }),
            ..RepositoryMetadata::default()
        };
        let b = RepositoryMetadata {
            plugins: Some(Plugins {
                plugin: vec![plugin("compiler"), plugin("surefire")],
            }),
            ..RepositoryMetadata::default()
        };
        a.merge(&b);
        assert_eq!(a.plugins.unwrap().plugin.len(), 2);
    }
}
