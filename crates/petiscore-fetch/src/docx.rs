//! Plain-text extraction from DOCX documents.
//!
//! A DOCX file is a zip archive; the text lives in `word/document.xml`.
//! Output order follows the source extraction contract: body paragraphs in
//! document order first, then table cell text, all newline-joined. Blank
//! paragraphs and blank cells are dropped.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a valid DOCX archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Extract the text of a DOCX file on disk.
pub fn extract_text(path: &Path) -> Result<String, DocxError> {
    let file = File::open(path)?;
    extract_text_from_reader(file)
}

/// Extract the text of a DOCX archive from any seekable reader.
pub fn extract_text_from_reader<R: Read + Seek>(reader: R) -> Result<String, DocxError> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut document = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut document)?;
    extract_from_document_xml(&document)
}

/// Walk `word/document.xml` collecting run text per paragraph.
///
/// Paragraphs outside any `w:tbl` go to the body; paragraphs inside a table
/// cell are joined per cell. Nested tables are treated as part of the
/// enclosing cell's depth and their paragraphs land in the innermost cell.
fn extract_from_document_xml(xml: &str) -> Result<String, DocxError> {
    let mut reader = Reader::from_str(xml);

    let mut body: Vec<String> = Vec::new();
    let mut cells: Vec<String> = Vec::new();

    let mut table_depth = 0usize;
    let mut in_cell = false;
    let mut in_text = false;
    let mut current_para = String::new();
    let mut cell_paras: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:tc" => {
                    in_cell = true;
                    cell_paras.clear();
                }
                b"w:p" => current_para.clear(),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:tc" => {
                    let cell = cell_paras.join("\n");
                    if !cell.trim().is_empty() {
                        cells.push(cell);
                    }
                    cell_paras.clear();
                    in_cell = false;
                }
                b"w:p" => {
                    if table_depth == 0 {
                        if !current_para.trim().is_empty() {
                            body.push(current_para.clone());
                        }
                    } else if in_cell {
                        cell_paras.push(current_para.clone());
                    }
                    current_para.clear();
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Text(t) => {
                if in_text {
                    current_para.push_str(&t.unescape()?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    body.extend(cells);
    Ok(body.join("\n"))
}
