//! Document text extraction boundary. Pure, side-effect free: bytes in,
//! text out, or a typed error. The pipeline only ever sees plain text.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Document format as declared by the caller (file extension or MIME type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredType {
    PlainText,
    Pdf,
    Docx,
}

impl DeclaredType {
    /// Infers a declared type from a file name or extension string.
    pub fn from_name(name: &str) -> Result<Self, AppError> {
        let lower = name.to_lowercase();
        if lower.ends_with(".txt") || lower.ends_with(".md") || lower == "txt" || lower == "text" {
            Ok(DeclaredType::PlainText)
        } else if lower.ends_with(".pdf") || lower == "pdf" {
            Ok(DeclaredType::Pdf)
        } else if lower.ends_with(".docx") || lower.ends_with(".doc") || lower == "docx" {
            Ok(DeclaredType::Docx)
        } else {
            Err(AppError::UnsupportedFormat(format!(
                "cannot determine document type for '{name}' (supported: txt, md, pdf)"
            )))
        }
    }
}

/// Extracts plain text from raw document bytes.
///
/// PDF uses the `pdf-extract` crate. DOCX is recognized but not supported
/// by this stack and returns `UnsupportedFormat`.
pub fn extract_text(bytes: &[u8], declared_type: DeclaredType) -> Result<String, AppError> {
    match declared_type {
        DeclaredType::PlainText => {
            let text = String::from_utf8(bytes.to_vec())
                .map_err(|e| AppError::Extraction(format!("invalid UTF-8 text: {e}")))?;
            ensure_nonempty(text)
        }
        DeclaredType::Pdf => {
            let text = pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| AppError::Extraction(format!("PDF extraction failed: {e}")))?;
            ensure_nonempty(text)
        }
        DeclaredType::Docx => Err(AppError::UnsupportedFormat(
            "DOCX extraction is not supported; convert to PDF or plain text".to_string(),
        )),
    }
}

fn ensure_nonempty(text: String) -> Result<String, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Extraction(
            "document contained no extractable text".to_string(),
        ));
    }
    Ok(text)
}
