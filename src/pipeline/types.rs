//! Data model shared across the pipeline.

use serde::{Deserialize, Serialize};

/// Fallback document label when the upload carries no filename.
pub const DEFAULT_DOCUMENT_NAME: &str = "Aadhar_Card";

/// An uploaded document, owned by a single extraction call.
/// Immutable once received; dropped when the response is produced.
#[derive(Clone)]
pub struct DocumentPayload {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: String,
    pub size_bytes: u64,
}

impl DocumentPayload {
    /// The name the document is registered under on the remote service.
    pub fn document_name(&self) -> &str {
        self.file_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_DOCUMENT_NAME)
    }
}

impl std::fmt::Debug for DocumentPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentPayload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size_bytes", &self.size_bytes)
            .finish_non_exhaustive()
    }
}

/// Structured fields parsed from the recognized text.
///
/// Every field is always present; an unmatched field stays an empty string,
/// never null or absent. Serializes with the wire names the frontend expects
/// (`fatherName`, `dateOfBirth`, `idNumber`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionRecord {
    pub name: String,
    pub father_name: String,
    pub date_of_birth: String,
    pub id_number: String,
    pub address: String,
    pub gender: String,
}

impl ExtractionRecord {
    /// True when at least one field carries non-whitespace content.
    pub fn has_any_field(&self) -> bool {
        [
            &self.name,
            &self.father_name,
            &self.date_of_birth,
            &self.id_number,
            &self.address,
            &self.gender,
        ]
        .iter()
        .any(|field| !field.trim().is_empty())
    }
}

/// Final result of one extraction request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionReport {
    pub success: bool,
    pub extracted_data: ExtractionRecord,
    pub raw_text: String,
    pub message: String,
}
