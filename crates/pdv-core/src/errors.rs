use pdv_canonical::{CanonicalizationError, ParseError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by a package build. Every variant is terminal: no partial
/// package is ever produced.
#[derive(Error, Debug)]
pub enum PdvError {
    /// The input list was empty.
    #[error("no files supplied")]
    NoFilesSupplied,
    /// An input entry is missing a usable field.
    #[error("malformed input parameters for document {index}: {field} {reason}")]
    MalformedInput {
        /// Zero-based position of the offending entry.
        index: usize,
        /// Field name as it appears in manifests.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// `filePath` does not reference an existing regular file.
    #[error("file not found for document {index}: {}", path.display())]
    FileNotFound {
        /// Zero-based position of the offending entry.
        index: usize,
        /// Path as supplied.
        path: PathBuf,
    },
    /// The file exists but could not be read.
    #[error("failed to read {} for document {index}: {source}", path.display())]
    FileRead {
        /// Zero-based position of the offending entry.
        index: usize,
        /// Path as supplied.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The assembled tree could not be canonicalized.
    #[error("serialization failed: {0}")]
    Serialization(#[from] CanonicalizationError),
}

/// Errors that prevent a package from being verified at all.
///
/// Hash mismatches are not errors; they are reported as findings.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The bytes are not well-formed XML.
    #[error("package is not well-formed: {0}")]
    Parse(#[from] ParseError),
    /// The root element is not `pdv`.
    #[error("unexpected root element <{0}>")]
    UnexpectedRoot(String),
    /// A mandatory container element is missing.
    #[error("missing <{0}> element")]
    MissingElement(&'static str),
    /// A metadata record could not be re-canonicalized.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}
