//! Opaque, totally ordered project versions.
//!
//! Only the ordering contract matters to the graph algorithms, so the grammar
//! is deliberately small:
//! - Segments are split on `.`, `-`, `_` and on digit/letter boundaries
//! - Numeric segments compare as numbers and sort above text segments
//! - Text segments compare case-insensitively
//! - A missing segment equals `0` and sorts above any text qualifier,
//!   so `1.0-SNAPSHOT` < `1.0` == `1.0.0`

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A parsed version string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Version {
    raw: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
enum Segment {
    Number(u64),
    Text(String),
}

impl Version {
    pub fn parse(raw: &str) -> Self {
        let mut segments = parse_segments(raw);
        while segments.last() == Some(&Segment::Number(0)) {
            segments.pop();
        }
        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    /// The version exactly as it was written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }

    /// Normalized spelling: equal versions always share it.
    pub fn canonical(&self) -> String {
        self.segments
            .iter()
            .map(|seg| match seg {
                Segment::Number(n) => n.to_string(),
                Segment::Text(t) => t.clone(),
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

fn parse_segments(raw: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();

    let flush = |current: &mut String, segments: &mut Vec<Segment>| {
        if current.is_empty() {
            return;
        }
        let seg = match current.parse::<u64>() {
            Ok(n) => Segment::Number(n),
            Err(_) => Segment::Text(current.to_lowercase()),
        };
        segments.push(seg);
        current.clear();
    };

    for ch in raw.trim().chars() {
        if matches!(ch, '.' | '-' | '_') {
            flush(&mut current, &mut segments);
            continue;
        }
        let boundary = current
            .chars()
            .last()
            .is_some_and(|prev| prev.is_ascii_digit() != ch.is_ascii_digit());
        if boundary {
            flush(&mut current, &mut segments);
        }
        current.push(ch);
    }
    flush(&mut current, &mut segments);
    segments
}

fn compare_segments(a: Option<&Segment>, b: Option<&Segment>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(s), None) => compare_to_missing(s),
        (None, Some(s)) => compare_to_missing(s).reverse(),
        (Some(Segment::Number(x)), Some(Segment::Number(y))) => x.cmp(y),
        (Some(Segment::Text(x)), Some(Segment::Text(y))) => x.cmp(y),
        (Some(Segment::Number(_)), Some(Segment::Text(_))) => Ordering::Greater,
        (Some(Segment::Text(_)), Some(Segment::Number(_))) => Ordering::Less,
    }
}

fn compare_to_missing(seg: &Segment) -> Ordering {
    match seg {
        Segment::Number(0) => Ordering::Equal,
        Segment::Number(_) => Ordering::Greater,
        Segment::Text(_) => Ordering::Less,
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| compare_segments(self.segments.get(i), other.segments.get(i)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for Version {}

// Trailing zeros are trimmed at parse time, so equal versions hash the same.
impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments.hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<String> for Version {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for Version {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s)
    }

    #[test]
    fn numeric_segments_compare_as_numbers() {
        assert!(v("1.10") > v("1.9"));
        assert!(v("2.0") > v("1.99.99"));
    }

    #[test]
    fn trailing_zeros_are_equal() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1"), v("1.0"));
        assert_eq!(v("1.0").cmp(&v("1.0.0")), Ordering::Equal);
    }

    #[test]
    fn qualifier_sorts_before_release() {
        assert!(v("1.0-SNAPSHOT") < v("1.0"));
        assert!(v("1.0-alpha") < v("1.0-beta"));
        assert!(v("1.0-rc1") < v("1.0"));
    }

    #[test]
    fn text_is_case_insensitive() {
        assert_eq!(v("1.0-RC"), v("1.0-rc"));
    }

    #[test]
    fn letter_digit_boundary_splits() {
        assert!(v("1.0rc2") > v("1.0rc1"));
    }

    #[test]
    fn canonical_matches_equality() {
        assert_eq!(v("1.0.0").canonical(), v("1").canonical());
        assert_eq!(v("1.0-RC1").canonical(), "1.0.rc.1");
    }

    #[test]
    fn display_keeps_original_text() {
        assert_eq!(v("1.0.0-SNAPSHOT").to_string(), "1.0.0-SNAPSHOT");
    }

    #[test]
    fn empty_version_detected() {
        assert!(v("").is_empty());
        assert!(v("  ").is_empty());
        assert!(!v("1").is_empty());
    }
}
