//! Browser upload form

use axum::{response::Html, routing::get, Router};

use crate::state::AppState;

const UPLOAD_FORM: &str = include_str!("../../templates/upload.html");

pub async fn upload_form() -> Html<&'static str> {
    Html(UPLOAD_FORM)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(upload_form))
}
