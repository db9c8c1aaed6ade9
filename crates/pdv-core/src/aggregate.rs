//! Order-dependent aggregate hashes over a whole package.
//!
//! - content: `sha256(hex(h_1) || hex(h_2) || … || hex(h_n))`
//! - metadata: `sha256(c14n(m_1) || c14n(m_2) || … || c14n(m_n))`

use pdv_canonical::{sha256_hex, HexDigest};
use serde::Serialize;

/// The two package-level digests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateHashes {
    /// Digest over the concatenated canonical metadata records (`hash-ipdv`).
    pub metadata_hash: HexDigest,
    /// Digest over the concatenated hex content hashes (`hash-object`).
    pub content_hash: HexDigest,
}

/// Accumulates per-document hashes in input order.
#[derive(Debug, Default)]
pub struct HashChain {
    content: String,
    metadata: Vec<u8>,
}

impl HashChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one document's content hash and canonical metadata bytes.
    pub fn push(&mut self, content_hash: &HexDigest, canonical_metadata: &[u8]) {
        self.push_content(content_hash);
        self.push_metadata(canonical_metadata);
    }

    /// Appends a content hash only. Verification feeds declared hashes
    /// here as found, valid or not.
    pub fn push_content(&mut self, content_hash: impl AsRef<str>) {
        self.content.push_str(content_hash.as_ref());
    }

    /// Appends canonical metadata bytes only.
    pub fn push_metadata(&mut self, canonical_metadata: &[u8]) {
        self.metadata.extend_from_slice(canonical_metadata);
    }

    /// Computes both aggregate digests.
    pub fn finish(self) -> AggregateHashes {
        AggregateHashes {
            metadata_hash: sha256_hex(&self.metadata),
            content_hash: sha256_hex(self.content.as_bytes()),
        }
    }
}
