//! Document text extraction endpoints

use axum::{extract::Multipart, Json};

use crate::error::{Error, Result};
use crate::services::documents;
use crate::types::{DocumentAnalyzeRequest, DocumentAnalyzeResponse};

/// POST /api/v1/documents/analyze - Extract text from a base64 upload
pub async fn analyze_document(
    Json(request): Json<DocumentAnalyzeRequest>,
) -> Result<Json<DocumentAnalyzeResponse>> {
    tracing::info!(
        filename = %request.filename,
        mime_type = request.mime_type.as_deref().unwrap_or(""),
        "analyze document"
    );

    let response = tokio::task::spawn_blocking(move || documents::analyze(&request)).await??;
    Ok(Json(response))
}

/// POST /api/v1/documents/upload - Extract text from a multipart file upload
pub async fn upload_document(
    mut multipart: Multipart,
) -> Result<Json<DocumentAnalyzeResponse>> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("Failed to read multipart field: {}", e)))?
        .ok_or_else(|| Error::validation("No file in upload"))?;

    let filename = field
        .file_name()
        .map(str::to_string)
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| Error::validation("Filename is required"))?;
    let mime_type = field.content_type().map(str::to_string);

    let data = field
        .bytes()
        .await
        .map_err(|e| Error::validation(format!("Failed to read file: {}", e)))?;

    let response = tokio::task::spawn_blocking(move || {
        documents::analyze_bytes(&filename, &data, mime_type.as_deref())
    })
    .await??;

    Ok(Json(response))
}
