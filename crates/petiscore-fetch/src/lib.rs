//! Fetch layer: HTTP document download and DOCX text extraction.

mod docx;
mod http;

pub use docx::{DocxError, extract_text, extract_text_from_reader};
pub use http::{FetchClient, FetchError};
