//! Offline verification of existing packages.

use crate::aggregate::HashChain;
use crate::errors::VerifyError;
use crate::metadata::RECORD;
use crate::package::{
    ATTR_HASH, ATTR_HASH_TYPE, ATTR_NAME, DOCUMENT, HASH_IPDV, HASH_OBJECT, IPDV, OBJ_STORED, ROOT,
    STORE_TIME,
};
use base64::Engine;
use pdv_canonical::{parse, sha256_hex, Canonicalize, Canonicalizer, HashAlgorithm, HexDigest};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Overall outcome of a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerificationVerdict {
    /// Every hash matches.
    Ok,
    /// At least one finding was recorded.
    Invalid,
}

/// One integrity problem found in a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// A document's content does not hash to its declared `hash`.
    ContentHashMismatch {
        /// Document position.
        index: usize,
        /// Declared file name, if any.
        name: Option<String>,
        /// Declared hash (possibly empty).
        declared: String,
        /// Hash of the decoded content.
        computed: HexDigest,
    },
    /// A document's `hashType` is not `SHA256`.
    UnsupportedHashType {
        /// Document position.
        index: usize,
        /// Declared tag (possibly empty).
        declared: String,
    },
    /// A document's content is not valid base64.
    InvalidContentEncoding {
        /// Document position.
        index: usize,
        /// Decoder message.
        reason: String,
    },
    /// `hash-ipdv` does not match the metadata records.
    MetadataAggregateMismatch {
        /// Declared value.
        declared: String,
        /// Recomputed value.
        computed: HexDigest,
    },
    /// `hash-object` does not match the document hashes.
    ContentAggregateMismatch {
        /// Declared value.
        declared: String,
        /// Recomputed value.
        computed: HexDigest,
    },
    /// Different numbers of documents and metadata records.
    CountMismatch {
        /// `document` elements.
        documents: usize,
        /// `documento` records.
        records: usize,
    },
    /// A trailing `ipdv` element is absent.
    MissingElement {
        /// Element name.
        element: &'static str,
    },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::ContentHashMismatch {
                index,
                name,
                declared,
                computed,
            } => write!(
                f,
                "document {} ({}): declared hash {:?}, content hashes to {}",
                index,
                name.as_deref().unwrap_or("?"),
                declared,
                computed
            ),
            Finding::UnsupportedHashType { index, declared } => {
                write!(f, "document {}: unsupported hashType {:?}", index, declared)
            }
            Finding::InvalidContentEncoding { index, reason } => {
                write!(f, "document {}: content is not base64 ({})", index, reason)
            }
            Finding::MetadataAggregateMismatch { declared, computed } => {
                write!(f, "{}: declared {:?}, computed {}", HASH_IPDV, declared, computed)
            }
            Finding::ContentAggregateMismatch { declared, computed } => {
                write!(f, "{}: declared {:?}, computed {}", HASH_OBJECT, declared, computed)
            }
            Finding::CountMismatch { documents, records } => write!(
                f,
                "{} documents but {} metadata records",
                documents, records
            ),
            Finding::MissingElement { element } => write!(f, "missing <{}>", element),
        }
    }
}

/// Result of verifying one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// Overall verdict.
    pub verdict: VerificationVerdict,
    /// Number of `document` elements.
    pub documents: usize,
    /// Everything that failed, in discovery order.
    pub findings: Vec<Finding>,
}

impl VerificationReport {
    /// Returns `true` if the verdict is [`VerificationVerdict::Ok`].
    pub fn is_ok(&self) -> bool {
        self.verdict == VerificationVerdict::Ok
    }
}

/// Re-derives every hash of a package from its content.
///
/// The canonicalizer must match the one used to build the package, since
/// `hash-ipdv` covers the canonical bytes of each metadata record.
pub struct Verifier {
    canonicalizer: Box<dyn Canonicalize>,
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new(Canonicalizer::default())
    }
}

impl Verifier {
    /// Creates a verifier using `canonicalizer` for metadata records.
    pub fn new(canonicalizer: impl Canonicalize + 'static) -> Self {
        Self {
            canonicalizer: Box::new(canonicalizer),
        }
    }

    /// Verifies package bytes.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError`] when the bytes are not a package at all; hash
    /// mismatches are reported as [`Finding`]s instead.
    pub fn verify(&self, bytes: &[u8]) -> Result<VerificationReport, VerifyError> {
        let root = parse(bytes)?;
        if root.name() != ROOT {
            return Err(VerifyError::UnexpectedRoot(root.name().to_string()));
        }
        let obj_stored = root
            .child(OBJ_STORED)
            .ok_or(VerifyError::MissingElement(OBJ_STORED))?;
        let ipdv = root.child(IPDV).ok_or(VerifyError::MissingElement(IPDV))?;

        let mut findings = Vec::new();
        let mut chain = HashChain::new();
        let engine = base64::engine::general_purpose::STANDARD;

        let mut documents = 0;
        for (index, document) in obj_stored.elements_named(DOCUMENT).enumerate() {
            documents += 1;
            let declared_type = document.attribute(ATTR_HASH_TYPE).unwrap_or_default();
            if HashAlgorithm::parse(declared_type).is_none() {
                findings.push(Finding::UnsupportedHashType {
                    index,
                    declared: declared_type.to_string(),
                });
            }

            // `hash-object` covers the declared hashes, not the recomputed ones.
            let declared = document.attribute(ATTR_HASH).unwrap_or_default();
            chain.push_content(declared);
            match engine.decode(document.text()) {
                Ok(content) => {
                    let computed = sha256_hex(&content);
                    if computed.as_str() != declared {
                        findings.push(Finding::ContentHashMismatch {
                            index,
                            name: document.attribute(ATTR_NAME).map(str::to_string),
                            declared: declared.to_string(),
                            computed,
                        });
                    }
                }
                Err(err) => findings.push(Finding::InvalidContentEncoding {
                    index,
                    reason: err.to_string(),
                }),
            }
        }

        let mut records = 0;
        for record in ipdv.elements_named(RECORD) {
            records += 1;
            chain.push_metadata(&self.canonicalizer.canonicalize(record)?);
        }
        if documents != records {
            findings.push(Finding::CountMismatch { documents, records });
        }

        let computed = chain.finish();
        match ipdv.child(HASH_IPDV).map(|e| e.text()) {
            None => findings.push(Finding::MissingElement { element: HASH_IPDV }),
            Some(declared) if declared != computed.metadata_hash.as_str() => {
                findings.push(Finding::MetadataAggregateMismatch {
                    declared,
                    computed: computed.metadata_hash.clone(),
                })
            }
            Some(_) => {}
        }
        match ipdv.child(HASH_OBJECT).map(|e| e.text()) {
            None => findings.push(Finding::MissingElement { element: HASH_OBJECT }),
            Some(declared) if declared != computed.content_hash.as_str() => {
                findings.push(Finding::ContentAggregateMismatch {
                    declared,
                    computed: computed.content_hash.clone(),
                })
            }
            Some(_) => {}
        }
        if ipdv.child(STORE_TIME).is_none() {
            findings.push(Finding::MissingElement { element: STORE_TIME });
        }

        for finding in &findings {
            warn!(%finding, "package verification finding");
        }
        debug!(documents, records, findings = findings.len(), "package verified");

        Ok(VerificationReport {
            verdict: if findings.is_empty() {
                VerificationVerdict::Ok
            } else {
                VerificationVerdict::Invalid
            },
            documents,
            findings,
        })
    }
}
