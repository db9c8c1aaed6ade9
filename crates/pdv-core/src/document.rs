//! Document descriptors and their normalization.

use crate::errors::PdvError;
use crate::identifiers::{DocumentId, IdGenerator, DOCUMENT_ID_LEN};
use crate::mime::{read_head, MimeSniffer};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One document to preserve, as declared by the caller.
///
/// Every field except `file_path` is optional; empty strings count as
/// absent. Manifests use camelCase keys:
///
/// ```json
/// [{"filePath": "contract.pdf", "documentId": "CONTRACT-2024-000001", "subject": "Contract"}]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInput {
    /// Location of the source bytes.
    #[serde(default)]
    pub file_path: Option<PathBuf>,
    /// Display name; defaults to the basename of `file_path`.
    #[serde(default)]
    pub file_name: Option<String>,
    /// Media type; defaults to a type sniffed from content.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// 20-byte identifier; anything else is replaced by a generated one.
    #[serde(default)]
    pub document_id: Option<String>,
    /// Free-text description; defaults to `"{documentId} - ({index})"`.
    #[serde(default)]
    pub subject: Option<String>,
}

impl DocumentInput {
    /// Creates an input for `path` with every other field defaulted.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Sets the display name.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Sets the media type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Sets the document identifier.
    pub fn with_document_id(mut self, id: impl Into<String>) -> Self {
        self.document_id = Some(id.into());
        self
    }

    /// Sets the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

/// A validated document with every default resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    /// Zero-based position in the input list.
    pub index: usize,
    /// Path of an existing regular file.
    pub file_path: PathBuf,
    /// Non-empty display name.
    pub file_name: String,
    /// Non-empty media type.
    pub mime_type: String,
    /// Identifier, fixed for the rest of the build.
    pub document_id: DocumentId,
    /// Subject line.
    pub subject: String,
}

impl NormalizedDocument {
    /// Reads the whole file. The handle is closed before returning.
    pub fn read_content(&self) -> Result<Vec<u8>, PdvError> {
        fs::read(&self.file_path).map_err(|source| PdvError::FileRead {
            index: self.index,
            path: self.file_path.clone(),
            source,
        })
    }
}

/// Validates `inputs` and resolves defaults, preserving order.
///
/// # Errors
///
/// - [`PdvError::NoFilesSupplied`] if `inputs` is empty
/// - [`PdvError::MalformedInput`] if an entry has no usable `filePath`
/// - [`PdvError::FileNotFound`] if a path is not an existing regular file
/// - [`PdvError::FileRead`] if a file cannot be read for sniffing
pub fn normalize(
    inputs: &[DocumentInput],
    ids: &dyn IdGenerator,
    sniffer: &dyn MimeSniffer,
) -> Result<Vec<NormalizedDocument>, PdvError> {
    if inputs.is_empty() {
        return Err(PdvError::NoFilesSupplied);
    }
    inputs
        .iter()
        .enumerate()
        .map(|(index, input)| normalize_one(index, input, ids, sniffer))
        .collect()
}

fn normalize_one(
    index: usize,
    input: &DocumentInput,
    ids: &dyn IdGenerator,
    sniffer: &dyn MimeSniffer,
) -> Result<NormalizedDocument, PdvError> {
    let file_path = input
        .file_path
        .as_deref()
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or(PdvError::MalformedInput {
            index,
            field: "filePath",
            reason: "is missing",
        })?;

    if !is_regular_file(file_path) {
        return Err(PdvError::FileNotFound {
            index,
            path: file_path.to_path_buf(),
        });
    }

    let file_name = match present(&input.file_name) {
        Some(name) => name.to_string(),
        None => file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or(PdvError::MalformedInput {
                index,
                field: "filePath",
                reason: "has no file name",
            })?,
    };

    let mime_type = match present(&input.mime_type) {
        Some(mime_type) => mime_type.to_string(),
        None => {
            let head = read_head(file_path).map_err(|source| PdvError::FileRead {
                index,
                path: file_path.to_path_buf(),
                source,
            })?;
            sniffer.sniff(&head)
        }
    };

    let document_id = match input
        .document_id
        .as_deref()
        .filter(|id| id.len() == DOCUMENT_ID_LEN)
    {
        Some(id) => DocumentId::parse(id).map_err(|_| PdvError::MalformedInput {
            index,
            field: "documentId",
            reason: "is not 20 bytes long",
        })?,
        None => ids.generate(),
    };

    let subject = match present(&input.subject) {
        Some(subject) => subject.to_string(),
        None => format!("{} - ({})", document_id, index),
    };

    debug!(
        index,
        file_name = %file_name,
        mime_type = %mime_type,
        document_id = %document_id,
        generated_id = document_id.is_generated(),
        "document normalized"
    );

    Ok(NormalizedDocument {
        index,
        file_path: file_path.to_path_buf(),
        file_name,
        mime_type,
        document_id,
        subject,
    })
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
}
