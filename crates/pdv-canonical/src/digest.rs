use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;
use std::sync::OnceLock;

use crate::validation::ValidationError;

/// Hash algorithms a package may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// SHA-256, written as `SHA256` in packages.
    #[serde(rename = "SHA256")]
    Sha256,
}

impl HashAlgorithm {
    /// Tag used in the `hashType` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "SHA256",
        }
    }

    /// Parses a `hashType` tag.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "SHA256" => Some(Self::Sha256),
            _ => None,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase hex SHA-256 digest (64 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexDigest(String);

impl TryFrom<String> for HexDigest {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<HexDigest> for String {
    fn from(digest: HexDigest) -> Self {
        digest.0
    }
}

impl HexDigest {
    /// Parses a validated lowercase hex digest.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let value = value.into();
        let re = PATTERN.get_or_init(|| Regex::new(r"^[0-9a-f]{64}$").expect("invalid regex"));
        if !re.is_match(&value) {
            return Err(ValidationError::PatternMismatch {
                field: "digest",
                value,
            });
        }
        Ok(Self(value))
    }

    /// Hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for HexDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// SHA-256 of `bytes` as lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> HexDigest {
    HexDigest(hex::encode(Sha256::digest(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(
            sha256_hex(b"").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex(b"hello").as_str(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn parse_requires_lowercase_hex() {
        let digest = sha256_hex(b"world");
        assert_eq!(HexDigest::parse(digest.as_str()).unwrap(), digest);
        assert!(HexDigest::parse(digest.as_str().to_uppercase()).is_err());
        assert!(HexDigest::parse("abc").is_err());
    }

    #[test]
    fn deserialization_validates() {
        let digest = sha256_hex(b"hello");
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(serde_json::from_str::<HexDigest>(&json).unwrap(), digest);
        assert!(serde_json::from_str::<HexDigest>(r#""not-a-digest""#).is_err());
        assert!(serde_json::from_str::<HexDigest>(&json.to_uppercase()).is_err());
    }

    #[test]
    fn hash_algorithm_tag() {
        assert_eq!(HashAlgorithm::Sha256.to_string(), "SHA256");
        assert_eq!(HashAlgorithm::parse("SHA256"), Some(HashAlgorithm::Sha256));
        assert_eq!(HashAlgorithm::parse("sha-256"), None);
    }
}
