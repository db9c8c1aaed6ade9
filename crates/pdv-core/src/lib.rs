//! Builds and verifies preservation packages (PdV).
//!
//! A package bundles documents, their metadata records, per-document SHA-256
//! hashes and two aggregate hashes into one canonical XML document.
//!
//! Pipeline, one linear pass in input order:
//! - normalize inputs ([`normalize`]): path checks, mime sniffing, id and subject defaults
//! - hash each file and build its metadata record ([`build_metadata_record`])
//! - canonicalize each record and fold it into the [`HashChain`]
//! - assemble and canonicalize the whole tree ([`PackageBuilder::build`])
//!
//! Core invariants:
//! - Identical input (with pinned ids and closure date) yields identical bytes
//! - Aggregate hashes depend on document order
//! - A failed build returns an error and nothing else
//!
//! Transport of the resulting bytes is up to the caller.
#![deny(missing_docs)]

/// Order-dependent aggregate hashes.
pub mod aggregate;
/// Document descriptors and normalization.
pub mod document;
/// Error types for building and verifying.
pub mod errors;
/// Document identifiers and generators.
pub mod identifiers;
/// Per-document metadata records.
pub mod metadata;
/// Content-based media type detection.
pub mod mime;
/// Package assembly.
pub mod package;
/// Organizational constants (producer, recipient, retention).
pub mod profile;
/// Offline package verification.
pub mod verification;

pub use aggregate::{AggregateHashes, HashChain};
pub use document::{normalize, DocumentInput, NormalizedDocument};
pub use errors::{PdvError, VerifyError};
pub use identifiers::{DocumentId, FixedIdGenerator, IdGenerator, TimestampIdGenerator};
pub use metadata::build_metadata_record;
pub use mime::{ContentSniffer, MimeSniffer, DEFAULT_MIME_TYPE};
pub use package::{build_pdv, Package, PackageBuilder, PackageSummary, StoredDocument};
pub use profile::{Party, PreservationProfile};
pub use verification::{Finding, VerificationReport, VerificationVerdict, Verifier};
