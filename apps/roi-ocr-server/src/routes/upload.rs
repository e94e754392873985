//! PDF upload endpoint
//!
//! `POST /upload_pdf` accepts a single multipart field named `file`, stores
//! it for the duration of the request and runs it through region
//! extraction, OCR and pattern mapping.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::extract::{extract_region, ExtractError};
use crate::mapper::PatternMap;
use crate::state::AppState;
use crate::upload::{allowed_file, StoredUpload, UploadRejection};

/// Response body when raw OCR text is requested alongside the mapping
#[derive(Serialize)]
pub struct OcrTextResponse {
    pub ocr_text: String,
    pub ocr_json: PatternMap,
}

/// Create the upload router
pub fn router() -> Router<AppState> {
    Router::new().route("/upload_pdf", post(upload_pdf))
}

/// A validated file part
struct ReceivedFile {
    filename: String,
    data: Bytes,
}

async fn upload_pdf(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Response> {
    let mut multipart =
        multipart.map_err(|e| UploadRejection::Malformed(e.body_text()))?;
    let file = receive_file(&mut multipart).await?;

    let stored = StoredUpload::save(&state.config().upload.dir, &file.filename, &file.data)
        .await
        .map_err(AppError::Storage)?;

    let (text, fields) = process(&state, &stored).await?;

    tracing::info!(
        upload_id = %stored.id(),
        file_name = %stored.original_name(),
        fields = fields.len(),
        matched = fields.matched(),
        "Processed upload"
    );

    if state.config().upload.include_ocr_text {
        Ok(Json(OcrTextResponse {
            ocr_text: text,
            ocr_json: fields,
        })
        .into_response())
    } else {
        Ok(Json(fields).into_response())
    }
}

/// Find the `file` part and validate its filename.
///
/// Parts without a filename are form fields, not files, and are skipped.
async fn receive_file(multipart: &mut Multipart) -> Result<ReceivedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadRejection::Malformed(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        tracing::debug!(file_name = %filename, "Received file part");

        if filename.is_empty() {
            return Err(UploadRejection::NoSelectedFile.into());
        }
        if !allowed_file(&filename) {
            return Err(UploadRejection::InvalidFormat.into());
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| UploadRejection::Malformed(e.body_text()))?;

        return Ok(ReceivedFile { filename, data });
    }

    Err(UploadRejection::MissingFilePart.into())
}

/// Run extraction, recognition and mapping for a stored upload.
///
/// The crop artifact is dropped (and deleted) as soon as its bytes are read
/// or the step that created it fails.
async fn process(state: &AppState, stored: &StoredUpload) -> Result<(String, PatternMap)> {
    let image = {
        let region = extract_region(stored.path(), &state.config().upload.dir).await?;
        tracing::debug!(
            upload_id = %stored.id(),
            width = region.width,
            height = region.height,
            "Extracted region of interest"
        );
        region.read_bytes().await.map_err(ExtractError::from)?
    };

    let text = state.ocr().recognize(&image).await?;
    tracing::debug!(
        upload_id = %stored.id(),
        provider = state.ocr().provider_name(),
        chars = text.len(),
        "Recognized text"
    );

    let fields = state.patterns().map(&text);
    Ok((text, fields))
}
