//! Player identifiers and dataset fingerprints.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Opaque, stable player key as it appears in the dataset.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({})", self.0)
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for PlayerId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PlayerId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Content fingerprint of a loaded dataset.
///
/// SHA256 over the raw bytes, truncated to the first 16 hex characters.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetVersion(String);

impl DatasetVersion {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let hash = hex::encode(Sha256::digest(bytes));
        Self(hash[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for DatasetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DatasetVersion({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_compares_with_str() {
        let id = PlayerId::from("1042");
        assert_eq!(id, "1042");
        assert!(id != "1043");
        assert_eq!(id.as_str(), "1042");
    }

    #[test]
    fn test_player_id_serializes_as_plain_string() {
        let id = PlayerId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        let back: PlayerId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_player_id_debug() {
        let id = PlayerId::new("debug-test");
        assert_eq!(format!("{:?}", id), "PlayerId(debug-test)");
    }

    #[test]
    fn test_dataset_version_deterministic() {
        let a = DatasetVersion::from_bytes(br#"{"players":{}}"#);
        let b = DatasetVersion::from_bytes(br#"{"players":{}}"#);
        assert_eq!(a, b);
    }

    #[test]
    fn test_dataset_version_changes_with_content() {
        let a = DatasetVersion::from_bytes(b"one");
        let b = DatasetVersion::from_bytes(b"two");
        assert_ne!(a, b);
    }

    #[test]
    fn test_dataset_version_hex_format() {
        let v = DatasetVersion::from_bytes(b"test");
        assert_eq!(v.as_str().len(), 16);
        assert!(v.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
