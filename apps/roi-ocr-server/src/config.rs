//! Configuration management for the ROI OCR server
//!
//! All settings are read once at startup from the environment (after
//! `.env` has been loaded by the binary) and passed by reference to the
//! components that need them.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default request body limit: 25MB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Default timeout for a single OCR call
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub ocr: OcrConfig,
    pub patterns: PatternConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory holding uploads and crop artifacts while a request runs
    pub dir: PathBuf,
    pub max_bytes: usize,
    /// Respond with `{"ocr_text", "ocr_json"}` instead of the bare field map
    pub include_ocr_text: bool,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub credentials_path: PathBuf,
    pub endpoint: String,
    /// `None` leaves the remote call unbounded
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct PatternConfig {
    /// Pattern artifact to load; the built-in list is used when unset
    pub path: Option<PathBuf>,
}

/// Fatal startup errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("OCR credentials file not found: {0}")]
    MissingCredentials(PathBuf),

    #[error("Invalid OCR credentials in {path}: {reason}")]
    InvalidCredentials { path: PathBuf, reason: String },

    #[error("Failed to read pattern file {path}: {source}")]
    PatternFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid pattern file: {0}")]
    PatternFormat(String),

    #[error("Invalid pattern #{index} ({pattern:?}): {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to prepare upload directory {path}: {source}")]
    UploadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            upload: UploadConfig {
                dir: PathBuf::from("uploads"),
                max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
                include_ocr_text: false,
            },
            ocr: OcrConfig {
                credentials_path: PathBuf::from("credentials.json"),
                endpoint: DEFAULT_VISION_ENDPOINT.to_string(),
                timeout: Some(Duration::from_secs(DEFAULT_OCR_TIMEOUT_SECS)),
            },
            patterns: PatternConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let timeout_secs = parse_var(&var, "OCR_TIMEOUT_SECS", DEFAULT_OCR_TIMEOUT_SECS)?;

        Ok(Config {
            server: ServerConfig {
                host: var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var(&var, "SERVER_PORT", defaults.server.port)?,
            },
            upload: UploadConfig {
                dir: var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.upload.dir),
                max_bytes: parse_var(&var, "MAX_UPLOAD_BYTES", defaults.upload.max_bytes)?,
                include_ocr_text: parse_bool(&var, "INCLUDE_OCR_TEXT", false)?,
            },
            ocr: OcrConfig {
                credentials_path: var("VISION_CREDENTIALS_PATH")
                    .or_else(|| var("GOOGLE_APPLICATION_CREDENTIALS"))
                    .map(PathBuf::from)
                    .unwrap_or(defaults.ocr.credentials_path),
                endpoint: var("VISION_ENDPOINT")
                    .map(|endpoint| endpoint.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.ocr.endpoint),
                timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            },
            patterns: PatternConfig {
                path: var("PATTERNS_PATH").map(PathBuf::from),
            },
        })
    }

    /// Create the upload directory if it does not exist yet
    pub fn ensure_upload_dir(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.upload.dir).map_err(|source| ConfigError::UploadDir {
            path: self.upload.dir.clone(),
            source,
        })
    }
}

fn parse_var<F, T>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}

fn parse_bool<F>(var: &F, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue { name, value }),
        },
        None => Ok(default),
    }
}
