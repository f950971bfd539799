#![forbid(unsafe_code)]

//! Version grammar.
//!
//! Three shapes of version string show up in a repository:
//! - release versions (`1.0`, `2.3.1`),
//! - generic snapshot versions, ending with the literal `SNAPSHOT` marker (`1.0-SNAPSHOT`),
//! - unique (timestamped) snapshot versions (`1.0-20230101.120000-3`).
//!
//! Directories are always named after the *base version*: the generic label for snapshots,
//! the version itself for releases.

use std::{cmp::Ordering, fmt, sync::LazyLock};

use regex::Regex;

/// Literal snapshot marker.
pub const SNAPSHOT: &str = "SNAPSHOT";

static UNIQUE_SNAPSHOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*)-(\d{8}\.\d{6})-(\d+)$").expect("unique snapshot pattern is valid")
});

static TIMESTAMP_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{8}\.\d{6})-(\d+)$").expect("timestamp token pattern is valid")
});

/// True if `version` ends with the snapshot marker.
#[must_use]
pub fn is_generic_snapshot(version: &str) -> bool {
    version.ends_with(SNAPSHOT)
}

/// True if `version` is a timestamped snapshot (`<base>-<yyyyMMdd.HHmmss>-<build>`).
#[must_use]
pub fn is_unique_snapshot(version: &str) -> bool {
    UNIQUE_SNAPSHOT.is_match(version)
}

/// True for both generic and unique snapshot versions.
#[must_use]
pub fn is_snapshot(version: &str) -> bool {
    is_generic_snapshot(version) || is_unique_snapshot(version)
}

/// Base (directory-level) version.
///
/// `1.0-20230101.120000-3` becomes `1.0-SNAPSHOT`; every other version is returned as is.
#[must_use]
pub fn base_version(version: &str) -> String {
    match UNIQUE_SNAPSHOT.captures(version) {
        Some(caps) => format!("{}-{SNAPSHOT}", &caps[1]),
        None => version.to_string(),
    }
}

/// Version with the snapshot marker (and its separator) removed: `1.0-SNAPSHOT` → `1.0`.
#[must_use]
pub fn release_part(version: &str) -> &str {
    match version.strip_suffix(SNAPSHOT) {
        Some(rest) => rest.strip_suffix('-').unwrap_or(rest),
        None => match UNIQUE_SNAPSHOT.captures(version) {
            Some(caps) => caps.get(1).map_or(version, |m| m.as_str()),
            None => version,
        },
    }
}

/// A resolved snapshot: `<base>-<timestamp>-<build>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SnapshotVersion {
    base: String,
    timestamp: String,
    build_number: u32,
}

impl SnapshotVersion {
    /// Build from the release part of a generic version plus timestamp/build.
    pub fn new<B: Into<String>, T: Into<String>>(base: B, timestamp: T, build_number: u32) -> Self {
        Self {
            base: base.into(),
            timestamp: timestamp.into(),
            build_number,
        }
    }

    /// Parse a unique snapshot version string.
    #[must_use]
    pub fn parse(version: &str) -> Option<Self> {
        let caps = UNIQUE_SNAPSHOT.captures(version)?;
        let build_number = caps[3].parse().ok()?;
        Some(Self::new(&caps[1], &caps[2], build_number))
    }

    /// Parse a bare `timestamp-build` token against a known base.
    #[must_use]
    pub fn from_token(base: &str, token: &str) -> Option<Self> {
        let caps = TIMESTAMP_TOKEN.captures(token)?;
        let build_number = caps[2].parse().ok()?;
        Some(Self::new(base, &caps[1], build_number))
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn build_number(&self) -> u32 {
        self.build_number
    }

    /// Generic label of the directory holding this snapshot.
    #[must_use]
    pub fn generic_version(&self) -> String {
        format!("{}-{SNAPSHOT}", self.base)
    }

    fn sort_key(&self) -> (&str, u32) {
        (&self.timestamp, self.build_number)
    }
}

impl fmt::Display for SnapshotVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.base, self.timestamp, self.build_number)
    }
}

impl PartialOrd for SnapshotVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SnapshotVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.base.cmp(&other.base))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Number(u64),
    Text(&'a str),
}

fn tokenize(version: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for part in version.split(['.', '-', '_']) {
        let mut start = 0;
        let bytes = part.as_bytes();
        for i in 1..=bytes.len() {
            let boundary =
                i == bytes.len() || bytes[i].is_ascii_digit() != bytes[i - 1].is_ascii_digit();
            if boundary {
                let piece = &part[start..i];
                tokens.push(match piece.parse::<u64>() {
                    Ok(n) => Token::Number(n),
                    Err(_) => Token::Text(piece),
                });
                start = i;
            }
        }
    }
    tokens
}

fn qualifier_rank(text: &str) -> u8 {
    match text.to_ascii_lowercase().as_str() {
        "alpha" | "a" => 0,
        "beta" | "b" => 1,
        "milestone" | "m" => 2,
        "rc" | "cr" => 3,
        "snapshot" => 4,
        "" | "ga" | "final" | "release" => 5,
        "sp" => 6,
        _ => 7,
    }
}

fn cmp_token(a: Option<Token<'_>>, b: Option<Token<'_>>) -> Ordering {
    match (a, b) {
        (Some(Token::Number(x)), Some(Token::Number(y))) => x.cmp(&y),
        (Some(Token::Number(_)), Some(Token::Text(_))) => Ordering::Greater,
        (Some(Token::Text(_)), Some(Token::Number(_))) => Ordering::Less,
        (Some(Token::Text(x)), Some(Token::Text(y))) => qualifier_rank(x)
            .cmp(&qualifier_rank(y))
            .then_with(|| x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase())),
        (Some(Token::Number(x)), None) => x.cmp(&0),
        (None, Some(Token::Number(y))) => 0.cmp(&y),
        (Some(Token::Text(x)), None) => qualifier_rank(x).cmp(&qualifier_rank("")),
        (None, Some(Token::Text(y))) => qualifier_rank("").cmp(&qualifier_rank(y)),
        (None, None) => Ordering::Equal,
    }
}

/// Compare two version strings the way a repository orders them.
///
/// Numeric components compare numerically, qualifiers rank
/// `alpha < beta < milestone < rc < snapshot < release < sp`, and a release
/// sorts after its own snapshots and pre-releases (`1.0-SNAPSHOT < 1.0 < 1.0.1`).
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let ta = tokenize(a);
    let tb = tokenize(b);
    for i in 0..ta.len().max(tb.len()) {
        let ord = cmp_token(ta.get(i).copied(), tb.get(i).copied());
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
