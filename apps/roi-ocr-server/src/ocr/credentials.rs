//! Cloud Vision credentials
//!
//! Supports Google service-account key files (OAuth2 JWT bearer flow) and
//! plain API-key files. Credentials are loaded once at startup; access
//! tokens are minted lazily and cached until shortly before they expire.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::types::OcrError;
use crate::config::ConfigError;

pub const VISION_SCOPE: &str = "https://www.googleapis.com/auth/cloud-vision";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens are refreshed this long before their reported expiry
const EXPIRY_MARGIN_SECS: i64 = 60;

/// On-disk credentials formats
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum CredentialsFile {
    ServiceAccount {
        client_email: String,
        private_key: String,
        #[serde(default = "default_token_uri")]
        token_uri: String,
    },
    ApiKey {
        api_key: String,
    },
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Loaded credentials for the Vision API
pub enum Credentials {
    ServiceAccount(ServiceAccount),
    ApiKey(String),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ServiceAccount(account) => f
                .debug_struct("ServiceAccount")
                .field("client_email", &account.client_email)
                .field("token_uri", &account.token_uri)
                .finish_non_exhaustive(),
            Credentials::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
        }
    }
}

impl Credentials {
    /// Load and validate a credentials file.
    ///
    /// A missing file, malformed JSON or an unusable private key is a fatal
    /// configuration error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingCredentials(path.to_path_buf()));
        }

        let invalid = |reason: String| ConfigError::InvalidCredentials {
            path: path.to_path_buf(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        Self::from_json(&content).map_err(invalid)
    }

    /// Parse credentials from their JSON representation
    pub fn from_json(content: &str) -> Result<Self, String> {
        let file: CredentialsFile = serde_json::from_str(content).map_err(|e| e.to_string())?;

        match file {
            CredentialsFile::ServiceAccount {
                client_email,
                private_key,
                token_uri,
            } => {
                let key = EncodingKey::from_rsa_pem(private_key.as_bytes())
                    .map_err(|e| format!("unusable private key: {}", e))?;
                Ok(Credentials::ServiceAccount(ServiceAccount {
                    client_email,
                    token_uri,
                    key,
                    cached: Mutex::new(None),
                }))
            }
            CredentialsFile::ApiKey { api_key } => {
                if api_key.trim().is_empty() {
                    return Err("api_key is empty".to_string());
                }
                Ok(Credentials::ApiKey(api_key))
            }
        }
    }

    /// Attach authentication to an outgoing Vision request
    pub async fn authorize(
        &self,
        client: &reqwest::Client,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, OcrError> {
        match self {
            Credentials::ApiKey(key) => Ok(request.header("x-goog-api-key", key.as_str())),
            Credentials::ServiceAccount(account) => {
                let token = account.access_token(client).await?;
                Ok(request.bearer_auth(token))
            }
        }
    }
}

/// Service-account identity with a cached access token
pub struct ServiceAccount {
    client_email: String,
    token_uri: String,
    key: EncodingKey,
    cached: Mutex<Option<AccessToken>>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(EXPIRY_MARGIN_SECS) > now
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

impl ServiceAccount {
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Return a valid access token, exchanging a fresh JWT assertion when the
    /// cached one is missing or about to expire.
    async fn access_token(&self, client: &reqwest::Client) -> Result<String, OcrError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let assertion = self.sign_assertion(now)?;
        let response = client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| OcrError::Auth(format!("token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Auth(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| OcrError::Auth(format!("failed to parse token response: {}", e)))?;

        tracing::debug!(
            client_email = %self.client_email,
            expires_in = token.expires_in,
            "Obtained Vision access token"
        );

        let access = AccessToken {
            value: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        };
        let value = access.value.clone();
        *cached = Some(access);
        Ok(value)
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, OcrError> {
        let iat = now.timestamp();
        let claims = Claims {
            iss: &self.client_email,
            scope: VISION_SCOPE,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| OcrError::Auth(format!("failed to sign assertion: {}", e)))
    }
}
