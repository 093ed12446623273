//! Dotted version ordinals
//!
//! A `VersionOrdinal` is an ordered sequence of non-negative integers
//! parsed from a dot-separated string ("1.4.1" -> [1, 4, 1]). Ordering is
//! exact lexicographic sequence comparison: position-wise up to the
//! shorter length, then by length, so "1.2" sorts before "1.2.0".
//! Downstream range checks (`previous < since <= current`) depend on this
//! behavior being preserved exactly.
//!
//! There is no semantic-versioning pre-release or build-metadata handling:
//! ordinals of any arity are valid ("1.2", "1.2.3.4").

use extup_errors::VersionError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An ordered tuple of non-negative integers derived from a dotted string
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionOrdinal(Vec<u64>);

impl VersionOrdinal {
    /// The fresh-install baseline, `0.0.0`
    #[must_use]
    pub fn zero() -> Self {
        Self(vec![0, 0, 0])
    }

    /// Construct from raw segments
    ///
    /// # Panics
    ///
    /// Panics if `segments` is empty; parse a string instead when the
    /// input is not statically known to be non-empty.
    #[must_use]
    pub fn from_segments(segments: Vec<u64>) -> Self {
        assert!(!segments.is_empty(), "version ordinal needs >= 1 segment");
        Self(segments)
    }

    /// The integer segments, most significant first
    #[must_use]
    pub fn segments(&self) -> &[u64] {
        &self.0
    }

    /// Whether this ordinal is the `0.0.0` fresh-install baseline
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&s| s == 0)
    }
}

impl FromStr for VersionOrdinal {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(VersionError::InvalidVersion {
                input: s.to_string(),
            });
        }

        let segments: Result<Vec<u64>, _> = s
            .split('.')
            .map(|segment| {
                segment
                    .parse::<u64>()
                    .map_err(|_| VersionError::InvalidSegment {
                        input: s.to_string(),
                        segment: segment.to_string(),
                    })
            })
            .collect();

        Ok(Self(segments?))
    }
}

impl fmt::Display for VersionOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strs: Vec<_> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", strs.join("."))
    }
}

impl Serialize for VersionOrdinal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for VersionOrdinal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
