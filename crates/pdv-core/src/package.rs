//! Package assembly.
//!
//! ```text
//! <pdv>
//!   <obj-stored>
//!     <document type=".." name=".." hashType="SHA256" hash="..">base64</document> …
//!   </obj-stored>
//!   <ipdv>
//!     <documento IDDocumento="..">…</documento> …
//!     <hash-ipdv>..</hash-ipdv><hash-object>..</hash-object><store-time>..</store-time>
//!   </ipdv>
//! </pdv>
//! ```
//!
//! The real output has no whitespace between elements.

use crate::aggregate::{AggregateHashes, HashChain};
use crate::document::{normalize, DocumentInput, NormalizedDocument};
use crate::errors::PdvError;
use crate::identifiers::{DocumentId, IdGenerator, TimestampIdGenerator};
use crate::metadata::build_metadata_record;
use crate::mime::{ContentSniffer, MimeSniffer};
use crate::profile::PreservationProfile;
use base64::Engine;
use chrono::{Local, NaiveDate};
use pdv_canonical::{sha256_hex, Canonicalize, Canonicalizer, Element, HashAlgorithm, HexDigest};
use serde::Serialize;
use tracing::{debug, info};

/// Root element.
pub const ROOT: &str = "pdv";
/// Container of the stored documents.
pub const OBJ_STORED: &str = "obj-stored";
/// One stored document.
pub const DOCUMENT: &str = "document";
/// Container of the metadata records and aggregate hashes.
pub const IPDV: &str = "ipdv";
/// Aggregate metadata hash.
pub const HASH_IPDV: &str = "hash-ipdv";
/// Aggregate content hash.
pub const HASH_OBJECT: &str = "hash-object";
/// Retention period.
pub const STORE_TIME: &str = "store-time";

/// `document` attribute carrying the media type.
pub const ATTR_TYPE: &str = "type";
/// `document` attribute carrying the file name.
pub const ATTR_NAME: &str = "name";
/// `document` attribute carrying the hash algorithm tag.
pub const ATTR_HASH_TYPE: &str = "hashType";
/// `document` attribute carrying the content hash.
pub const ATTR_HASH: &str = "hash";

/// Build-time data for one document; dropped once the package is assembled.
struct DocumentRecord {
    content: Vec<u8>,
    content_hash: HexDigest,
    metadata: Element,
    canonical_metadata: Vec<u8>,
}

/// Summary of one document inside a built package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    /// Zero-based position.
    pub index: usize,
    /// Display name written to `name`.
    pub file_name: String,
    /// Media type written to `type`.
    pub mime_type: String,
    /// Identifier written to `IDDocumento`.
    pub document_id: DocumentId,
    /// Subject written to `oggettodocumento`.
    pub subject: String,
    /// SHA-256 of the raw content.
    pub content_hash: HexDigest,
    /// Raw content length.
    pub size_bytes: u64,
}

/// A fully assembled preservation package.
#[derive(Debug, Clone)]
pub struct Package {
    bytes: Vec<u8>,
    summary: PackageSummary,
}

/// Everything about a package except its bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSummary {
    /// Documents in package order.
    pub documents: Vec<StoredDocument>,
    /// Aggregate digests.
    #[serde(flatten)]
    pub aggregate: AggregateHashes,
    /// Value of `store-time`.
    pub retention_period: String,
    /// Closure date written to every record.
    pub closure_date: NaiveDate,
}

impl Package {
    /// Canonical package bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the package, returning its canonical bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Per-document summaries in package order.
    pub fn documents(&self) -> &[StoredDocument] {
        &self.summary.documents
    }

    /// `hash-object` value.
    pub fn aggregate_content_hash(&self) -> &HexDigest {
        &self.summary.aggregate.content_hash
    }

    /// `hash-ipdv` value.
    pub fn aggregate_metadata_hash(&self) -> &HexDigest {
        &self.summary.aggregate.metadata_hash
    }

    /// `store-time` value.
    pub fn retention_period(&self) -> &str {
        &self.summary.retention_period
    }

    /// Summary without the package bytes.
    pub fn summary(&self) -> &PackageSummary {
        &self.summary
    }
}

/// Assembles preservation packages.
///
/// Collaborators are fixed when the builder is configured; `build` itself
/// keeps no state between calls.
///
/// # Example
///
/// ```rust,no_run
/// use pdv_core::{DocumentInput, PackageBuilder};
///
/// let inputs = vec![
///     DocumentInput::new("invoice.pdf").with_document_id("INVOICE-2024-0000001"),
///     DocumentInput::new("receipt.pdf").with_subject("Receipt"),
/// ];
/// let package = PackageBuilder::new().build(&inputs)?;
/// std::fs::write("pdv.xml", package.as_bytes())?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct PackageBuilder {
    profile: PreservationProfile,
    canonicalizer: Box<dyn Canonicalize>,
    id_generator: Box<dyn IdGenerator>,
    sniffer: Box<dyn MimeSniffer>,
    closure_date: Option<NaiveDate>,
}

impl Default for PackageBuilder {
    fn default() -> Self {
        Self {
            profile: PreservationProfile::default(),
            canonicalizer: Box::new(Canonicalizer::default()),
            id_generator: Box::new(TimestampIdGenerator),
            sniffer: Box::new(ContentSniffer),
            closure_date: None,
        }
    }
}

impl PackageBuilder {
    /// Builder with the default profile, canonicalizer, id generator and sniffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the preservation profile.
    pub fn with_profile(mut self, profile: PreservationProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Replaces the canonical serializer.
    pub fn with_canonicalizer(mut self, canonicalizer: impl Canonicalize + 'static) -> Self {
        self.canonicalizer = Box::new(canonicalizer);
        self
    }

    /// Replaces the generator used for missing or invalid document ids.
    pub fn with_id_generator(mut self, generator: impl IdGenerator + 'static) -> Self {
        self.id_generator = Box::new(generator);
        self
    }

    /// Replaces the media type sniffer.
    pub fn with_sniffer(mut self, sniffer: impl MimeSniffer + 'static) -> Self {
        self.sniffer = Box::new(sniffer);
        self
    }

    /// Pins the closure date instead of using today's local date.
    pub fn with_closure_date(mut self, date: NaiveDate) -> Self {
        self.closure_date = Some(date);
        self
    }

    /// Active preservation profile.
    pub fn profile(&self) -> &PreservationProfile {
        &self.profile
    }

    /// Builds a package from `inputs`, in order.
    ///
    /// Files are read one at a time; each is closed before the next is
    /// opened.
    ///
    /// # Errors
    ///
    /// Any [`PdvError`]; nothing is returned on failure.
    pub fn build(&self, inputs: &[DocumentInput]) -> Result<Package, PdvError> {
        let documents = normalize(inputs, self.id_generator.as_ref(), self.sniffer.as_ref())?;
        let closure_date = self
            .closure_date
            .unwrap_or_else(|| Local::now().date_naive());

        let mut obj_stored = Element::new(OBJ_STORED);
        let mut ipdv = Element::new(IPDV);
        let mut chain = HashChain::new();
        let mut stored = Vec::with_capacity(documents.len());

        for document in &documents {
            let record = self.document_record(document, closure_date)?;
            debug!(
                index = document.index,
                content_hash = %record.content_hash,
                size_bytes = record.content.len(),
                "document hashed"
            );

            chain.push(&record.content_hash, &record.canonical_metadata);
            obj_stored.push_child(stored_element(document, &record));
            stored.push(StoredDocument {
                index: document.index,
                file_name: document.file_name.clone(),
                mime_type: document.mime_type.clone(),
                document_id: document.document_id.clone(),
                subject: document.subject.clone(),
                content_hash: record.content_hash,
                size_bytes: record.content.len() as u64,
            });
            ipdv.push_child(record.metadata);
        }

        let aggregate = chain.finish();
        ipdv.push_child(Element::new(HASH_IPDV).with_text(aggregate.metadata_hash.as_str()));
        ipdv.push_child(Element::new(HASH_OBJECT).with_text(aggregate.content_hash.as_str()));
        ipdv.push_child(Element::new(STORE_TIME).with_text(&self.profile.retention_period));

        let root = Element::new(ROOT).with_child(obj_stored).with_child(ipdv);
        let bytes = self.canonicalizer.canonicalize(&root)?;

        info!(
            documents = stored.len(),
            bytes = bytes.len(),
            hash_object = %aggregate.content_hash,
            hash_ipdv = %aggregate.metadata_hash,
            "preservation package built"
        );

        Ok(Package {
            bytes,
            summary: PackageSummary {
                documents: stored,
                aggregate,
                retention_period: self.profile.retention_period.clone(),
                closure_date,
            },
        })
    }

    fn document_record(
        &self,
        document: &NormalizedDocument,
        closure_date: NaiveDate,
    ) -> Result<DocumentRecord, PdvError> {
        let content = document.read_content()?;
        let content_hash = sha256_hex(&content);
        let metadata = build_metadata_record(document, closure_date, &self.profile);
        let canonical_metadata = self.canonicalizer.canonicalize(&metadata)?;
        Ok(DocumentRecord {
            content,
            content_hash,
            metadata,
            canonical_metadata,
        })
    }
}

fn stored_element(document: &NormalizedDocument, record: &DocumentRecord) -> Element {
    Element::new(DOCUMENT)
        .with_attribute(ATTR_TYPE, document.mime_type.as_str())
        .with_attribute(ATTR_NAME, document.file_name.as_str())
        .with_attribute(ATTR_HASH_TYPE, HashAlgorithm::Sha256.as_str())
        .with_attribute(ATTR_HASH, record.content_hash.as_str())
        .with_text(base64::engine::general_purpose::STANDARD.encode(&record.content))
}

/// Builds a package with the default [`PackageBuilder`] and returns its bytes.
pub fn build_pdv(inputs: &[DocumentInput]) -> Result<Vec<u8>, PdvError> {
    PackageBuilder::default().build(inputs).map(Package::into_bytes)
}
