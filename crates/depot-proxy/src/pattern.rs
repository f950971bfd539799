#![forbid(unsafe_code)]

use std::fmt;

use regex::Regex;

use crate::error::PolicyParseError;

/// Path glob used by source whitelists and blacklists.
///
/// `**` spans directories, `*` and `?` stay inside one segment. Matching is anchored on both
/// ends against the repository-relative path without a leading slash.
#[derive(Clone, Debug)]
pub struct PathPattern {
    glob: String,
    regex: Regex,
}

impl PathPattern {
    pub fn new(glob: &str) -> Result<Self, PolicyParseError> {
        let trimmed = glob.trim().trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(PolicyParseError::new("path pattern", glob));
        }
        let regex = Regex::new(&glob_to_regex(trimmed))
            .map_err(|_| PolicyParseError::new("path pattern", glob))?;
        Ok(Self {
            glob: trimmed.to_string(),
            regex,
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path.trim_start_matches('/'))
    }

    pub fn as_str(&self) -> &str {
        &self.glob
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.glob)
    }
}

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::from("^");
    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    // `**/` also matches no directory at all.
                    chars.next();
                    out.push_str("(.*/)?");
                } else {
                    out.push_str(".*");
                }
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    out.push('$');
    out
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("com/x/**", "com/x/lib/1.0/lib-1.0.jar", true)]
    #[case("com/x/**", "com/y/lib/1.0/lib-1.0.jar", false)]
    #[case("com/*/lib/**", "com/x/lib/1.0/lib-1.0.jar", true)]
    #[case("com/*/lib/**", "com/x/y/lib/1.0/lib-1.0.jar", false)]
    #[case("**/*.jar", "lib-1.0.jar", true)]
    #[case("**/*.jar", "com/x/lib/1.0/lib-1.0.jar", true)]
    #[case("**/*.jar", "com/x/lib/1.0/lib-1.0.pom", false)]
    #[case("/org/?pache/**", "org/apache/a/1/a-1.pom", true)]
    #[case("com/x.y/**", "com/xzy/a", false)]
    fn test_matches(#[case] glob: &str, #[case] path: &str, #[case] expected: bool) {
        let pattern = PathPattern::new(glob).unwrap();
        assert_eq!(pattern.matches(path), expected, "{glob} vs {path}");
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert!(PathPattern::new("  / ").is_err());
    }
}
