//! Petition metadata types shared between the collector, downloader, and scorer.

use serde::{Deserialize, Serialize};

/// One petition document selected by the collector.
///
/// Produced from the database query (one row per request, most recent
/// document per request) and persisted in `petitions_metadata.json`.
/// Immutable after collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetitionRecord {
    pub request_id: i64,
    /// Human-assigned ordinal quality label, 1-5.
    pub rating: i32,
    pub doc_id: i64,
    pub url: String,
    pub name: String,
    pub source: String,
    pub was_developed_with_ia: Option<bool>,
    pub remark: Option<String>,
    pub rating_text: Option<String>,
}

/// A petition whose document has been downloaded and its text extracted.
///
/// Produced by the downloader and persisted in `processed_petitions.json`;
/// the scorer iterates over these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedPetition {
    pub request_id: i64,
    pub rating: i32,
    pub docx_file: String,
    pub txt_file: String,
    /// Extracted text length in chars.
    pub text_length: usize,
    pub url: String,
    pub remark: Option<String>,
    pub rating_text: Option<String>,
}

impl PetitionRecord {
    /// Stem used for the on-disk document and text files, e.g. `1234_rating5`.
    pub fn file_stem(&self) -> String {
        format!("{}_rating{}", self.request_id, self.rating)
    }
}
