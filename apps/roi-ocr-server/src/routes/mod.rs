//! Route modules for the ROI OCR server

pub mod form;
pub mod health;
pub mod upload;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let max_upload_bytes = state.config().upload.max_bytes;

    Router::new()
        .merge(form::router())
        .merge(health::router())
        .merge(upload::router())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
