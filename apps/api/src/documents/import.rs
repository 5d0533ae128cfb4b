//! Plain-text extraction for uploaded documents.
//!
//! `.txt` is decoded as UTF-8, `.pdf` goes through `pdf-extract`, and `.docx`
//! is read straight out of its `word/document.xml` part.

use std::io::{Cursor, Read};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::models::document::{Document, DocumentLabel};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("Failed to extract {file}: {reason}")]
    Extraction { file: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Pdf,
    Docx,
}

impl Format {
    fn of(file_name: &str) -> Option<Self> {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".txt") {
            Some(Format::Text)
        } else if lower.ends_with(".pdf") {
            Some(Format::Pdf)
        } else if lower.ends_with(".docx") {
            Some(Format::Docx)
        } else {
            None
        }
    }
}

/// Turns an uploaded file into a [`Document`] with a guessed label.
pub fn import_document(file_name: &str, bytes: &[u8]) -> Result<Document, ImportError> {
    let content = extract_text(file_name, bytes)?;
    Ok(Document {
        name: file_name.to_string(),
        label: DocumentLabel::guess(file_name),
        content,
    })
}

pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String, ImportError> {
    let format =
        Format::of(file_name).ok_or_else(|| ImportError::Unsupported(file_name.to_string()))?;
    let failed = |reason: String| ImportError::Extraction {
        file: file_name.to_string(),
        reason,
    };

    let text = match format {
        Format::Text => String::from_utf8_lossy(bytes).into_owned(),
        // pdf-extract panics on some malformed inputs instead of returning an error.
        Format::Pdf => std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
            .map_err(|_| failed("unreadable PDF".to_string()))?
            .map_err(|e| failed(e.to_string()))?,
        Format::Docx => docx_text(bytes).map_err(failed)?,
    };

    debug!(
        "Extracted {} chars from {file_name} ({format:?})",
        text.chars().count()
    );
    Ok(text.trim().to_string())
}

/// Reads paragraphs of a Word document, one per line.
fn docx_text(bytes: &[u8]) -> Result<String, String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| e.to_string())?
        .read_to_string(&mut xml)
        .map_err(|e| e.to_string())?;
    Ok(document_xml_text(&xml))
}

static PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:p(?:\s[^>]*)?>(.*?)</w:p>").expect("Failed to compile paragraph regex")
});

static RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:tab/>|<w:br/>")
        .expect("Failed to compile run regex")
});

fn document_xml_text(xml: &str) -> String {
    PARAGRAPH
        .captures_iter(xml)
        .map(|p| {
            RUN.captures_iter(&p[1])
                .map(|r| match r.get(1) {
                    Some(text) => unescape_xml(text.as_str()),
                    None if &r[0] == "<w:tab/>" => "\t".to_string(),
                    None => "\n".to_string(),
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
