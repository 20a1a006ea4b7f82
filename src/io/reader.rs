//! Upload decoders.
//!
//! A `SampleReader` reduces an uploaded document to plain text; the ingest
//! module then parses that text. Which reader applies is decided by the
//! declared content type of the upload, not by the file name.

use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

// `<w:p>`, `<w:p >` or `<w:p attr="…">`, but not `<w:pPr>` and not self-closing `<w:p/>`.
static PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<w:p(?:\s[^>]*[^/>]|\s)?>(.*?)</w:p>"#).expect("paragraph pattern is valid")
});
static RUN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<w:t(?:\s[^>]*[^/>]|\s)?>(.*?)</w:t>"#).expect("run text pattern is valid")
});

/// Turns raw upload bytes into text with one logical line per paragraph.
pub trait SampleReader: Send + Sync {
    fn read(&self, bytes: &[u8]) -> Result<String, AppError>;
}

/// UTF-8 text or CSV.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextReader;

impl SampleReader for PlainTextReader {
    fn read(&self, bytes: &[u8]) -> Result<String, AppError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| AppError::invalid(format!("File is not valid UTF-8 text: {e}")))?;
        // Editors on Windows like to prefix UTF-8 files with a BOM.
        Ok(text.trim_start_matches('\u{feff}').to_string())
    }
}

/// WordprocessingML (`.docx`): paragraphs become lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredDocumentReader;

impl SampleReader for StructuredDocumentReader {
    fn read(&self, bytes: &[u8]) -> Result<String, AppError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| AppError::invalid(format!("Could not open document: {e}")))?;
        let mut part = archive
            .by_name("word/document.xml")
            .map_err(|e| AppError::invalid(format!("Document has no body part: {e}")))?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .map_err(|e| AppError::invalid(format!("Could not read document body: {e}")))?;

        Ok(document_paragraphs(&xml).join("\n"))
    }
}

/// Extract the text of every `<w:p>` paragraph, in document order.
fn document_paragraphs(xml: &str) -> Vec<String> {
    PARAGRAPH
        .captures_iter(xml)
        .map(|p| {
            let body = p.get(1).map_or("", |m| m.as_str());
            RUN_TEXT
                .captures_iter(body)
                .filter_map(|t| t.get(1))
                .map(|m| unescape_xml(m.as_str()))
                .collect::<String>()
        })
        .collect()
}

fn unescape_xml(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = tail.find(';') else {
            out.push_str(tail);
            return out;
        };
        let entity = &tail[1..end];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => out.push(c),
            None => out.push_str(&tail[..=end]),
        }
        rest = &tail[end + 1..];
    }
    out.push_str(rest);
    out
}

/// Pick a reader for a declared MIME type (parameters such as `charset` are ignored).
pub fn reader_for_content_type(content_type: &str) -> Result<Box<dyn SampleReader>, AppError> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "text/plain" | "text/csv" | "application/csv" | "application/vnd.ms-excel" => {
            Ok(Box::new(PlainTextReader))
        }
        DOCX_CONTENT_TYPE => Ok(Box::new(StructuredDocumentReader)),
        other => Err(AppError::invalid(format!(
            "Unsupported file type '{other}': upload a .txt, .csv or .docx file."
        ))),
    }
}

/// Content type for a local file, used by the CLI where no MIME type is declared.
pub fn content_type_for_path(path: &Path) -> Result<&'static str, AppError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("txt") => Ok("text/plain"),
        Some("csv") => Ok("text/csv"),
        Some("docx") => Ok(DOCX_CONTENT_TYPE),
        _ => Err(AppError::invalid(format!(
            "Unsupported file type for '{}': expected .txt, .csv or .docx.",
            path.display()
        ))),
    }
}
