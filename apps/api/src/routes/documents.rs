//! Document extraction endpoint. Accepts a multipart upload with a `file`
//! field and an optional `declared_type` field; falls back to the file name
//! when no type is declared.

use axum::extract::Multipart;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::{extract_text, DeclaredType};

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
    pub character_count: usize,
}

/// POST /api/v1/documents/extract
pub async fn handle_extract(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut declared_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
                file = Some((name, bytes.to_vec()));
            }
            Some("declared_type") => {
                declared_type = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("bad declared_type: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let (name, bytes) =
        file.ok_or_else(|| AppError::Validation("missing 'file' field".to_string()))?;
    let declared = match declared_type {
        Some(t) => DeclaredType::from_name(&t)?,
        None => DeclaredType::from_name(&name)?,
    };

    let text = extract_text(&bytes, declared)?;
    info!(file = %name, characters = text.chars().count(), "Extracted document text");

    Ok(Json(ExtractResponse {
        character_count: text.chars().count(),
        text,
    }))
}
