#![forbid(unsafe_code)]

use md5::{Digest, Md5};
use sha1::Sha1;

/// Checksum side files kept next to fetched artifacts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChecksumKind {
    Sha1,
    Md5,
}

impl ChecksumKind {
    pub const ALL: [ChecksumKind; 2] = [ChecksumKind::Sha1, ChecksumKind::Md5];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Md5 => "md5",
        }
    }

    /// Lower-case hex digest of `data`.
    pub fn compute(self, data: &[u8]) -> String {
        match self {
            Self::Sha1 => hex::encode(Sha1::digest(data)),
            Self::Md5 => hex::encode(Md5::digest(data)),
        }
    }

    /// True for `*.sha1` / `*.md5` paths.
    pub fn is_checksum_path(path: &str) -> bool {
        Self::ALL
            .iter()
            .any(|k| path.rsplit_once('.').is_some_and(|(_, ext)| ext == k.extension()))
    }
}

/// First token of a checksum file; tolerates the `<digest>  <file name>` format.
pub fn parse_checksum(body: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(body).ok()?;
    let token = text.split_whitespace().next()?;
    (!token.is_empty() && token.chars().all(|c| c.is_ascii_hexdigit()))
        .then(|| token.to_ascii_lowercase())
}

/// Result of checking one checksum kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ChecksumStatus {
    /// Checksums were not requested.
    #[default]
    NotChecked,
    /// Upstream value matched; stored.
    Verified,
    /// Upstream had none; nothing stored.
    Missing,
    /// Upstream value did not match; nothing stored.
    Mismatch { expected: String, actual: String },
    /// Computed locally and stored.
    Generated,
}

impl ChecksumStatus {
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch { .. })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChecksumReport {
    pub sha1: ChecksumStatus,
    pub md5: ChecksumStatus,
}

impl ChecksumReport {
    pub fn get(&self, kind: ChecksumKind) -> &ChecksumStatus {
        match kind {
            ChecksumKind::Sha1 => &self.sha1,
            ChecksumKind::Md5 => &self.md5,
        }
    }

    pub fn set(&mut self, kind: ChecksumKind, status: ChecksumStatus) {
        match kind {
            ChecksumKind::Sha1 => self.sha1 = status,
            ChecksumKind::Md5 => self.md5 = status,
        }
    }

    pub fn has_mismatch(&self) -> bool {
        self.sha1.is_mismatch() || self.md5.is_mismatch()
    }
}
