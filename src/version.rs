//! Version comparison for dot separated numeric versions
//!
//! "1.2" and "1.2.0" are equal: the shorter version is padded with zero
//! segments before comparing segment by segment.

use std::cmp::Ordering;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::BindError;

/// Pattern for 1, 1.2, 1.2.3, ...
static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.\d+)*$").expect("version pattern is valid"));

/// Outcome of comparing the first version against the second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionOrder {
    Greater,
    Equal,
    Lesser,
}

impl From<Ordering> for VersionOrder {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Greater => VersionOrder::Greater,
            Ordering::Equal => VersionOrder::Equal,
            Ordering::Less => VersionOrder::Lesser,
        }
    }
}

impl fmt::Display for VersionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionOrder::Greater => write!(f, "GREATER"),
            VersionOrder::Equal => write!(f, "EQUAL"),
            VersionOrder::Lesser => write!(f, "LESSER"),
        }
    }
}

/// Compare two versions segment by segment
pub fn compare(left: &str, right: &str) -> Result<VersionOrder, BindError> {
    let left = segments(left)?;
    let right = segments(right)?;

    let len = left.len().max(right.len());
    for i in 0..len {
        let a = left.get(i).copied().unwrap_or(0);
        let b = right.get(i).copied().unwrap_or(0);
        match a.cmp(&b) {
            Ordering::Equal => continue,
            other => return Ok(other.into()),
        }
    }
    Ok(VersionOrder::Equal)
}

/// Whether `version` is a well-formed dot separated numeric version
pub fn is_valid(version: &str) -> bool {
    segments(version).is_ok()
}

fn segments(version: &str) -> Result<Vec<i32>, BindError> {
    let trimmed = version.trim();
    if !VERSION_PATTERN.is_match(trimmed) {
        return Err(BindError::InvalidVersion {
            version: version.to_string(),
        });
    }
    trimmed
        .split('.')
        .map(|part| {
            part.parse::<i32>().map_err(|_| BindError::InvalidVersionPart {
                part: part.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_makes_equal() {
        assert_eq!(compare("1.2", "1.2.0").unwrap(), VersionOrder::Equal);
        assert_eq!(compare("1", "1.0.0.0").unwrap(), VersionOrder::Equal);
    }

    #[test]
    fn greater_and_lesser() {
        assert_eq!(compare("2.0", "1.9.9").unwrap(), VersionOrder::Greater);
        assert_eq!(compare("1.9.9", "2.0").unwrap(), VersionOrder::Lesser);
        assert_eq!(compare("1.10", "1.9").unwrap(), VersionOrder::Greater);
        assert_eq!(compare("1.0.1", "1").unwrap(), VersionOrder::Greater);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(compare(" 1.2 ", "1.2").unwrap(), VersionOrder::Equal);
    }

    #[test]
    fn non_numeric_segment_fails() {
        let err = compare("1.a", "1.0").unwrap_err();
        assert!(err.to_string().contains("YB-020"));
        assert!(compare("1.0", "").is_err());
        assert!(compare("1..0", "1").is_err());
        assert!(compare("v1", "1").is_err());
    }

    #[test]
    fn oversized_segment_fails() {
        let err = compare("99999999999", "1").unwrap_err();
        assert!(err.to_string().contains("YB-021"));
    }

    #[test]
    fn validity() {
        assert!(is_valid("1"));
        assert!(is_valid("1.0.0"));
        assert!(!is_valid(""));
        assert!(!is_valid("1."));
        assert!(!is_valid("1.-1"));
    }

    #[test]
    fn display_matches_names() {
        assert_eq!(VersionOrder::Greater.to_string(), "GREATER");
        assert_eq!(VersionOrder::Equal.to_string(), "EQUAL");
        assert_eq!(VersionOrder::Lesser.to_string(), "LESSER");
    }
}
