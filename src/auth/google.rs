//! Bearer tokens for Google Cloud (Vertex AI).
//!
//! Either a pre-issued access token (`access_token` / `GCLOUD_ACCESS_TOKEN`)
//! or a service-account key file (`credentials_path` /
//! `GOOGLE_APPLICATION_CREDENTIALS`) exchanged through the OAuth 2.0
//! JWT-bearer grant. Exchanged tokens are cached and refreshed shortly
//! before they expire.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::errors::UnillmError;

const PROVIDER: &str = "google";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
/// Refresh this many seconds before expiry.
const EXPIRY_SAFETY_WINDOW: i64 = 300;

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountCredentials {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl ServiceAccountCredentials {
    pub fn from_json(json: &str) -> Result<Self, UnillmError> {
        serde_json::from_str(json)
            .map_err(|e| UnillmError::Config(format!("Invalid service account JSON: {}", e)))
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
pub struct CachedToken {
    token: String,
    exp_unix: i64,
}

pub enum GoogleTokenSource {
    Static(String),
    ServiceAccount {
        creds: ServiceAccountCredentials,
        cache: Mutex<Option<CachedToken>>,
    },
}

impl GoogleTokenSource {
    /// Pick the token source. Explicit config wins over the environment:
    /// `access_token`, `credentials_path`, then `GCLOUD_ACCESS_TOKEN`,
    /// `GOOGLE_APPLICATION_CREDENTIALS`. Fails with `MissingCredential` when
    /// none is set.
    pub async fn from_config(config: &ProviderConfig) -> Result<Self, UnillmError> {
        if let Some(token) = config.option("access_token") {
            return Ok(Self::Static(token));
        }
        if let Some(path) = config.option("credentials_path") {
            return Self::from_key_file(&path).await;
        }

        if let Some(token) = env_value("GCLOUD_ACCESS_TOKEN") {
            return Ok(Self::Static(token));
        }
        let path = env_value("GOOGLE_APPLICATION_CREDENTIALS").ok_or_else(|| UnillmError::MissingCredential {
            provider: PROVIDER.to_string(),
            variable: "GOOGLE_APPLICATION_CREDENTIALS".to_string(),
        })?;
        Self::from_key_file(&path).await
    }

    async fn from_key_file(path: &str) -> Result<Self, UnillmError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| UnillmError::Config(format!("Cannot read Google credentials file {}: {}", path, e)))?;
        Ok(Self::service_account(ServiceAccountCredentials::from_json(&json)?))
    }

    pub fn service_account(creds: ServiceAccountCredentials) -> Self {
        Self::ServiceAccount { creds, cache: Mutex::new(None) }
    }

    /// Project id embedded in a service-account key, if any.
    pub fn project_id(&self) -> Option<&str> {
        match self {
            Self::Static(_) => None,
            Self::ServiceAccount { creds, .. } => creds.project_id.as_deref(),
        }
    }

    /// Current bearer token, exchanging a fresh one when needed.
    pub async fn token(&self, http: &Client) -> Result<String, UnillmError> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::ServiceAccount { creds, cache } => {
                // Held across the exchange so concurrent callers refresh once.
                let mut guard = cache.lock().await;
                let now = chrono::Utc::now().timestamp();
                if let Some(cached) = guard.as_ref() {
                    if cached.exp_unix - EXPIRY_SAFETY_WINDOW > now {
                        return Ok(cached.token.clone());
                    }
                }

                let fresh = fetch_token(creds, http).await?;
                let token = fresh.token.clone();
                *guard = Some(fresh);
                Ok(token)
            }
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

async fn fetch_token(creds: &ServiceAccountCredentials, http: &Client) -> Result<CachedToken, UnillmError> {
    let now = chrono::Utc::now().timestamp();
    let token_uri = creds.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI);
    let assertion = sign_assertion(creds, token_uri, now)?;

    let form = [
        ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
        ("assertion", assertion.as_str()),
    ];
    let resp = http
        .post(token_uri)
        .form(&form)
        .send()
        .await
        .map_err(|e| UnillmError::request(PROVIDER, None, format!("Token endpoint request failed: {}", e)))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(UnillmError::request(
            PROVIDER,
            Some(status.as_u16()),
            format!("Token endpoint returned error: {}", body.trim()),
        ));
    }

    let tr: TokenResponse = resp
        .json()
        .await
        .map_err(|e| UnillmError::request(PROVIDER, None, format!("Invalid token response: {}", e)))?;

    debug!(client_email = %creds.client_email, expires_in = tr.expires_in, "Obtained Google access token");
    Ok(CachedToken { token: tr.access_token, exp_unix: now + tr.expires_in })
}

fn sign_assertion(creds: &ServiceAccountCredentials, token_uri: &str, now: i64) -> Result<String, UnillmError> {
    let claims = Claims {
        iss: &creds.client_email,
        scope: SCOPE,
        aud: token_uri,
        iat: now,
        exp: now + 3600,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.typ = Some("JWT".to_string());
    let key = EncodingKey::from_rsa_pem(creds.private_key.as_bytes())
        .map_err(|e| UnillmError::Config(format!("Invalid RSA private key (PEM): {}", e)))?;
    encode(&header, &claims, &key).map_err(|e| UnillmError::Config(format!("Failed to sign JWT: {}", e)))
}
