//! Text extraction from uploaded procurement documents

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Error, Result};
use crate::types::{DocumentAnalyzeRequest, DocumentAnalyzeResponse, TextStats};

/// Marker appended when `clean_text` truncates
pub const TRUNCATION_MARKER: &str = "\n[...text trunchiat]";

/// Supported upload kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// Detect from extension, with a PDF MIME type taking precedence
    pub fn detect(filename: &str, mime_type: Option<&str>) -> Result<Self> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        if extension == "pdf" || mime_type.is_some_and(|m| m.to_lowercase().contains("pdf")) {
            return Ok(DocumentKind::Pdf);
        }

        match extension.as_str() {
            "txt" | "md" | "markdown" => Ok(DocumentKind::Text),
            _ => Err(Error::UnsupportedFileType(extension)),
        }
    }
}

/// Decode, extract, clean and measure a base64 upload
pub fn analyze(request: &DocumentAnalyzeRequest) -> Result<DocumentAnalyzeResponse> {
    // MIME-style encoders wrap lines at 76 columns
    let compact: String = request
        .content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| Error::validation(format!("Conținut base64 invalid: {}", e)))?;

    analyze_bytes(&request.filename, &bytes, request.mime_type.as_deref())
}

/// Extract, clean and measure raw file bytes
pub fn analyze_bytes(
    filename: &str,
    bytes: &[u8],
    mime_type: Option<&str>,
) -> Result<DocumentAnalyzeResponse> {
    tracing::info!(
        filename,
        mime_type = mime_type.unwrap_or(""),
        size_bytes = bytes.len(),
        "extracting text"
    );

    let raw = extract_text(filename, bytes, mime_type)?;
    let text = clean_text(&raw, None);
    let stats = text_stats(&text);

    tracing::info!(
        filename,
        characters = stats.characters,
        words = stats.words,
        "document analyzed"
    );

    Ok(DocumentAnalyzeResponse {
        filename: filename.to_string(),
        text,
        stats,
        success: true,
    })
}

/// Text of a file, chosen by extension/MIME type
pub fn extract_text(filename: &str, bytes: &[u8], mime_type: Option<&str>) -> Result<String> {
    match DocumentKind::detect(filename, mime_type)? {
        DocumentKind::Pdf => extract_pdf(filename, bytes),
        DocumentKind::Text => Ok(decode_text(bytes)),
    }
}

/// UTF-8, falling back to Latin-1
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            tracing::warn!("text is not valid UTF-8, decoding as Latin-1");
            bytes.iter().map(|&b| b as char).collect()
        }
    }
}

/// Page texts, each introduced by a `[Pagina n]` marker
#[cfg(feature = "pdf")]
fn extract_pdf(filename: &str, bytes: &[u8]) -> Result<String> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| Error::parse(filename, format!("Eroare la procesarea PDF: {}", e)))?;

    let total = pages.len();
    let text = pages
        .into_iter()
        .enumerate()
        .filter(|(_, page)| !page.trim().is_empty())
        .map(|(i, page)| format!("[Pagina {}]\n{}\n", i + 1, page))
        .collect::<Vec<_>>()
        .join("\n");

    tracing::info!(pages = total, chars = text.chars().count(), "PDF text extracted");
    Ok(text)
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(filename: &str, _bytes: &[u8]) -> Result<String> {
    Err(Error::parse(
        filename,
        "PDF support is not enabled in this build",
    ))
}

/// Trim every line, drop empty ones, optionally cap the length in characters
pub fn clean_text(text: &str, max_chars: Option<usize>) -> String {
    let cleaned = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    match max_chars.and_then(|max| cleaned.char_indices().nth(max)) {
        Some((end, _)) => {
            tracing::warn!(
                original_chars = cleaned.chars().count(),
                max_chars = max_chars.unwrap_or_default(),
                "text truncated"
            );
            format!("{}{}", &cleaned[..end], TRUNCATION_MARKER)
        }
        None => cleaned,
    }
}

pub fn text_stats(text: &str) -> TextStats {
    let lines: Vec<&str> = text.split('\n').collect();
    TextStats {
        characters: text.chars().count(),
        words: text.split_whitespace().count(),
        lines: lines.len(),
        paragraphs: lines.iter().filter(|l| !l.trim().is_empty()).count(),
    }
}
