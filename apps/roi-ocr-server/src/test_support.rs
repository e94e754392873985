//! Helpers shared by unit tests

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;

use crate::config::Config;
use crate::mapper::PatternSet;
use crate::ocr::{MockDetector, OcrClient};
use crate::state::AppState;

/// Build a syntactically valid PDF with `pages` blank pages of
/// `width` x `height` points.
pub fn minimal_pdf(width: u32, height: u32, pages: usize) -> Vec<u8> {
    let kids = (0..pages)
        .map(|i| format!("{} 0 R", i + 3))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, pages),
    ];
    for _ in 0..pages {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] >>",
            width, height
        ));
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, object).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    out
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub const BOUNDARY: &str = "roi-ocr-test-boundary";

/// One part of a `multipart/form-data` body
pub struct Part {
    pub name: &'static str,
    pub filename: Option<&'static str>,
    pub data: Vec<u8>,
}

impl Part {
    pub fn file(filename: &'static str, data: Vec<u8>) -> Self {
        Self {
            name: "file",
            filename: Some(filename),
            data,
        }
    }

    pub fn text(name: &'static str, value: &str) -> Self {
        Self {
            name,
            filename: None,
            data: value.as_bytes().to_vec(),
        }
    }
}

/// Encode parts using [`BOUNDARY`]
pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/pdf\r\n\r\n",
                    part.name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name)
                    .as_bytes(),
            ),
        }
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Default config storing uploads in `upload_dir` with a short OCR timeout
pub fn test_config(upload_dir: &Path) -> Config {
    let mut config = Config::default();
    config.upload.dir = upload_dir.to_path_buf();
    config.ocr.timeout = Some(Duration::from_secs(5));
    config
}

pub fn state_with_config(config: Config, detector: MockDetector) -> AppState {
    let timeout = config.ocr.timeout;
    AppState::new(
        config,
        PatternSet::builtin().unwrap(),
        OcrClient::new(Arc::new(detector), timeout),
    )
}

/// Application state backed by `detector`, storing uploads in `upload_dir`
pub fn test_state(upload_dir: &Path, detector: MockDetector) -> AppState {
    state_with_config(test_config(upload_dir), detector)
}
