// ── MAC address canonicalization ──
//
// Every MAC-derived map key in the engine goes through this type, so any
// two spellings of the same address collide identically everywhere.
// Canonical form: lowercase, undelimited, exactly 12 hex digits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Separators accepted on input: `aa:bb:..`, `aa-bb-..`, `aabb.cc..`.
const SEPARATORS: [char; 3] = [':', '-', '.'];

/// MAC address, normalized to lowercase undelimited hex (`aabbccddeeff`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    /// Parse and canonicalize a textual MAC from any common format.
    ///
    /// Accepts colon-, dash-, or dot-separated spellings in mixed case.
    /// Fails with [`CacheError::InvalidMac`] unless the input contains
    /// exactly 12 hex digits.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, CacheError> {
        let raw = raw.as_ref();
        let cleaned = strip(raw);
        if cleaned.len() != 12 || !cleaned.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CacheError::InvalidMac {
                input: raw.to_owned(),
            });
        }
        Ok(Self(cleaned))
    }

    /// Non-validating fast path for bulk operations on already-known-good
    /// input: strips separators and lowercases, nothing more.
    pub fn normalize_lossy(raw: &str) -> String {
        strip(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn strip(raw: &str) -> String {
    raw.chars()
        .filter(|c| !SEPARATORS.contains(c))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_colon_separated() {
        let mac = MacAddress::parse("00:11:22:33:44:55").unwrap();
        assert_eq!(mac.as_str(), "001122334455");
    }

    #[test]
    fn parse_dash_and_dot_separated() {
        assert_eq!(
            MacAddress::parse("AA-BB-CC-DD-EE-FF").unwrap().as_str(),
            "aabbccddeeff"
        );
        assert_eq!(
            MacAddress::parse("aabb.ccdd.eeff").unwrap().as_str(),
            "aabbccddeeff"
        );
    }

    #[test]
    fn parse_mixed_case() {
        let mac = MacAddress::parse("aA:Bb:CC:dd:Ee:fF").unwrap();
        assert_eq!(mac.as_str(), "aabbccddeeff");
    }

    #[test]
    fn parse_is_idempotent() {
        let once = MacAddress::parse("5C:5B:35:00:00:01").unwrap();
        let twice = MacAddress::parse(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(MacAddress::parse("00:11:22:33:44").is_err());
        assert!(MacAddress::parse("001122334455aa").is_err());
        assert!(MacAddress::parse("").is_err());
    }

    #[test]
    fn parse_rejects_non_hex() {
        let err = MacAddress::parse("00:11:22:33:44:5g").unwrap_err();
        assert!(matches!(err, CacheError::InvalidMac { .. }));
    }

    #[test]
    fn normalize_lossy_does_not_validate() {
        assert_eq!(MacAddress::normalize_lossy("00:11:22:33:44:55"), "001122334455");
        // Garbage in, garbage out -- by contract for known-good bulk input.
        assert_eq!(MacAddress::normalize_lossy("nonsense"), "nonsense");
    }

    #[test]
    fn from_str_round_trips_display() {
        let mac: MacAddress = "00-1A-2B-3C-4D-5E".parse().unwrap();
        assert_eq!(mac.to_string(), "001a2b3c4d5e");
    }
}
