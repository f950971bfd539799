#![forbid(unsafe_code)]

use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PolicyParseError;

/// How long a local copy, or a recorded failure, stays valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum UpdatePolicy {
    /// Valid forever.
    Never,
    /// Invalid at the next check.
    Always,
    /// Valid for the given duration.
    Interval(Duration),
}

impl UpdatePolicy {
    pub fn daily() -> Self {
        Self::Interval(Duration::days(1))
    }

    pub fn hourly() -> Self {
        Self::Interval(Duration::hours(1))
    }

    pub fn minutes(minutes: i64) -> Self {
        Self::Interval(Duration::minutes(minutes))
    }

    /// True if something recorded at `since` must be checked again at `now`.
    #[must_use]
    pub fn is_expired(&self, since: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Self::Never => false,
            Self::Always => true,
            Self::Interval(interval) => now - since >= *interval,
        }
    }
}

impl FromStr for UpdatePolicy {
    type Err = PolicyParseError;

    /// `never`, `always`, `daily`, `hourly` or `interval:<minutes>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "never" | "once" => Ok(Self::Never),
            "always" => Ok(Self::Always),
            "daily" => Ok(Self::daily()),
            "hourly" => Ok(Self::hourly()),
            other => {
                let minutes = other
                    .strip_prefix("interval:")
                    .and_then(|m| m.parse::<i64>().ok())
                    .filter(|m| *m > 0)
                    .ok_or_else(|| PolicyParseError::new("update policy", s))?;
                Ok(Self::minutes(minutes))
            }
        }
    }
}

impl fmt::Display for UpdatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str("never"),
            Self::Always => f.write_str("always"),
            Self::Interval(d) if *d == Duration::days(1) => f.write_str("daily"),
            Self::Interval(d) if *d == Duration::hours(1) => f.write_str("hourly"),
            Self::Interval(d) => write!(f, "interval:{}", d.num_minutes()),
        }
    }
}

impl TryFrom<String> for UpdatePolicy {
    type Error = PolicyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UpdatePolicy> for String {
    fn from(value: UpdatePolicy) -> Self {
        value.to_string()
    }
}

/// What to do with checksum side files of a fetched artifact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumPolicy {
    /// Do not fetch checksums.
    Ignore,
    /// Fetch and verify; keep only the ones that match.
    #[default]
    Report,
    /// Like `Report`, and write locally computed checksums where upstream ones are missing or
    /// wrong.
    Fix,
}

impl FromStr for ChecksumPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "report" | "warn" => Ok(Self::Report),
            "fix" => Ok(Self::Fix),
            _ => Err(PolicyParseError::new("checksum policy", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("never", UpdatePolicy::Never)]
    #[case("ALWAYS", UpdatePolicy::Always)]
    #[case("daily", UpdatePolicy::daily())]
    #[case("hourly", UpdatePolicy::hourly())]
    #[case("interval:90", UpdatePolicy::minutes(90))]
    fn test_parse_update_policy(#[case] input: &str, #[case] expected: UpdatePolicy) {
        let parsed: UpdatePolicy = input.parse().unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string().parse::<UpdatePolicy>().unwrap(), expected);
    }

    #[rstest]
    #[case("sometimes")]
    #[case("interval:")]
    #[case("interval:-5")]
    #[case("interval:0")]
    fn test_reject_update_policy(#[case] input: &str) {
        assert!(input.parse::<UpdatePolicy>().is_err());
    }

    #[test]
    fn expiry() {
        let t0 = Utc::now();
        let later = t0 + Duration::minutes(30);
        assert!(!UpdatePolicy::Never.is_expired(t0, later));
        assert!(UpdatePolicy::Always.is_expired(t0, t0));
        assert!(!UpdatePolicy::hourly().is_expired(t0, later));
        assert!(UpdatePolicy::minutes(30).is_expired(t0, later));
    }

    #[test]
    fn policies_convert_to_strings() {
        assert_eq!(String::from(UpdatePolicy::minutes(15)), "interval:15");
        assert_eq!(UpdatePolicy::try_from("daily".to_string()).unwrap(), UpdatePolicy::daily());
        assert_eq!("fix".parse::<ChecksumPolicy>().unwrap(), ChecksumPolicy::Fix);
        assert!("verify".parse::<ChecksumPolicy>().is_err());
    }
}
