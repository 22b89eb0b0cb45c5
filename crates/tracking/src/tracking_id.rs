//! Shipment tracking identifiers.
//!
//! Identifiers look like `SWIFT-` followed by 8 to 12 uppercase alphanumerics.
//! Generated identifiers use 12: the low 8 base-36 digits of the current
//! millisecond timestamp and 4 random base-36 digits.

use crate::{Result, TrackingError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Required prefix for every tracking identifier.
pub const PREFIX: &str = "SWIFT-";

static TRACKING_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^SWIFT-[A-Z0-9]{8,12}$").expect("tracking id pattern is valid"));

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const TIMESTAMP_DIGITS: usize = 8;
const RANDOM_DIGITS: usize = 4;

/// A validated tracking identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackingId(String);

impl TrackingId {
    /// Mints a new identifier from the current time and fresh randomness.
    ///
    /// Collisions are unlikely but not checked against existing records.
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis().unsigned_abs();
        Self::from_parts(millis, Uuid::new_v4().as_bytes())
    }

    fn from_parts(millis: u64, entropy: &[u8; 16]) -> Self {
        let mut id = String::with_capacity(PREFIX.len() + TIMESTAMP_DIGITS + RANDOM_DIGITS);
        id.push_str(PREFIX);

        let mut digits = [b'0'; TIMESTAMP_DIGITS];
        let mut rest = millis;
        for slot in digits.iter_mut().rev() {
            *slot = BASE36[(rest % 36) as usize];
            rest /= 36;
        }
        id.extend(digits.iter().map(|&b| b as char));

        // The leading bytes of a v4 UUID carry no version or variant bits
        id.extend(
            entropy[..RANDOM_DIGITS]
                .iter()
                .map(|&b| BASE36[(b % 36) as usize] as char),
        );

        Self(id)
    }

    /// Returns true if `candidate` has the tracking identifier shape.
    ///
    /// Matching is case-sensitive.
    pub fn is_valid(candidate: &str) -> bool {
        TRACKING_ID_PATTERN.is_match(candidate)
    }

    /// Parses a user-supplied identifier.
    ///
    /// Surrounding whitespace is ignored; case is not normalized.
    pub fn parse(candidate: &str) -> Result<Self> {
        let trimmed = candidate.trim();
        if Self::is_valid(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(TrackingError::InvalidTrackingId(candidate.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TrackingId {
    type Err = TrackingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TrackingId {
    type Error = TrackingError;

    fn try_from(value: String) -> Result<Self> {
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(TrackingError::InvalidTrackingId(value))
        }
    }
}

impl From<TrackingId> for String {
    fn from(id: TrackingId) -> Self {
        id.0
    }
}

impl AsRef<str> for TrackingId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_valid() {
        for _ in 0..1000 {
            let id = TrackingId::generate();
            assert!(TrackingId::is_valid(id.as_str()), "generated {id}");
            assert_eq!(id.as_str().len(), PREFIX.len() + 12);
        }
    }

    #[test]
    fn test_known_shapes() {
        assert!(TrackingId::is_valid("SWIFT-ABCDEFGH"));
        assert!(TrackingId::is_valid("SWIFT-ABCDEFGH1234"));
        assert!(!TrackingId::is_valid("SWIFT-AB"));
        assert!(!TrackingId::is_valid("swift-abcdefgh"));
        assert!(!TrackingId::is_valid("SWIFT-ABCDEFGH12345"));
        assert!(!TrackingId::is_valid("SWIFT-ABCD-EFGH"));
        assert!(!TrackingId::is_valid(" SWIFT-ABCDEFGH"));
    }

    #[test]
    fn test_from_parts_is_deterministic() {
        let a = TrackingId::from_parts(1_700_000_000_000, &[7; 16]);
        let b = TrackingId::from_parts(1_700_000_000_000, &[7; 16]);
        assert_eq!(a, b);
        // 1_700_000_000_000 in base 36
        assert!(a.as_str().starts_with("SWIFT-LOYW3V28"));
        assert!(a.as_str().ends_with("7777"));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let id = TrackingId::parse("  SWIFT-ABCDEFGH\n").unwrap();
        assert_eq!(id.as_str(), "SWIFT-ABCDEFGH");
    }

    #[test]
    fn test_parse_rejects_lowercase() {
        let err = "swift-abcdefgh".parse::<TrackingId>().unwrap_err();
        assert_eq!(err.code(), crate::TrackingErrorCode::InvalidTrackingId);
    }

    #[test]
    fn test_serde_validates() {
        let id: TrackingId = serde_json::from_str("\"SWIFT-ABCDEFGH\"").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"SWIFT-ABCDEFGH\"");
        assert!(serde_json::from_str::<TrackingId>("\"SWIFT-1\"").is_err());
    }
}
