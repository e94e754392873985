//! Error types for the ROI OCR server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::extract::ExtractError;
use crate::ocr::OcrError;
use crate::upload::UploadRejection;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Request-scoped error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] UploadRejection),

    #[error("Error extracting ROI from PDF: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Error performing OCR on image: {0}")]
    Recognition(#[from] OcrError),

    #[error("Error saving uploaded file: {0}")]
    Storage(#[source] std::io::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Extraction(_) | AppError::Recognition(_) | AppError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(error = ?self, "{}", message);
        } else {
            tracing::warn!("Rejected upload: {}", message);
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
