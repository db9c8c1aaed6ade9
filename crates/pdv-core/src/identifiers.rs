//! Document identifiers and their generators.
//!
//! A supplied identifier is accepted only when it is exactly
//! [`DOCUMENT_ID_LEN`] bytes long. Anything else is replaced by a generated
//! `gCloud_<unix seconds>_<NN>` value, where `NN` is a random number in
//! `10..=99`.
//!
//! The generated form is weak: two builds in the same second have a 1 in 90
//! chance of colliding. Downstream consumers expect this exact shape, so it
//! is kept as is. Callers that need unique identifiers must supply their own.

use pdv_canonical::ValidationError;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Required length of a supplied document identifier, in bytes.
pub const DOCUMENT_ID_LEN: usize = 20;

/// Prefix of generated identifiers.
pub const GENERATED_ID_PREFIX: &str = "gCloud_";

/// Immutable document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Accepts a caller-supplied identifier of exactly [`DOCUMENT_ID_LEN`] bytes.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.len() != DOCUMENT_ID_LEN {
            return Err(ValidationError::PatternMismatch {
                field: "documentId",
                value,
            });
        }
        Ok(Self(value))
    }

    /// Builds a generated identifier from its parts.
    pub fn generated(unix_seconds: i64, suffix: u8) -> Self {
        Self(format!("{GENERATED_ID_PREFIX}{unix_seconds}_{suffix}"))
    }

    /// Returns `true` if the identifier has the generated `gCloud_<digits>_<NN>` shape.
    pub fn is_generated(&self) -> bool {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        PATTERN
            .get_or_init(|| Regex::new(r"^gCloud_\d+_\d{2}$").expect("invalid regex"))
            .is_match(&self.0)
    }

    /// Identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of identifiers for documents that do not supply a valid one.
pub trait IdGenerator: Send + Sync {
    /// Produces a new identifier.
    fn generate(&self) -> DocumentId;
}

/// Default generator: current unix time plus a two-digit random suffix.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampIdGenerator;

impl IdGenerator for TimestampIdGenerator {
    fn generate(&self) -> DocumentId {
        let now = chrono::Utc::now().timestamp();
        let suffix = rand::thread_rng().gen_range(10..=99u8);
        DocumentId::generated(now, suffix)
    }
}

/// Generator that always returns the same identifier, for reproducible builds.
#[derive(Debug, Clone)]
pub struct FixedIdGenerator(DocumentId);

impl FixedIdGenerator {
    /// Creates a generator returning `id` on every call.
    pub fn new(id: DocumentId) -> Self {
        Self(id)
    }
}

impl IdGenerator for FixedIdGenerator {
    fn generate(&self) -> DocumentId {
        self.0.clone()
    }
}
