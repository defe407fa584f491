//! Service-account authentication.
//!
//! The credential file is the standard service-account JSON key. A single
//! RS256-signed assertion is exchanged for a bearer token that lives for the
//! whole invocation; there is no refresh.

use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::SheetsError;

const SCOPES: &str = "https://www.googleapis.com/auth/spreadsheets \
                      https://www.googleapis.com/auth/drive.readonly";
const ASSERTION_TTL_SECS: i64 = 3600;
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

#[derive(Debug, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ServiceAccountKey {
    /// Loads and deserializes the key file. An unreadable path is the
    /// credentials-missing case; a readable but invalid file is unexpected.
    pub fn load(path: &Path) -> Result<Self, SheetsError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|_| SheetsError::CredentialsMissing(path.to_path_buf()))?;
        let key: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid service-account key '{}'", path.display()))?;
        Ok(key)
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub async fn fetch_access_token(
    http: &reqwest::Client,
    key: &ServiceAccountKey,
) -> Result<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        iss: &key.client_email,
        scope: SCOPES,
        aud: &key.token_uri,
        iat: now,
        exp: now + ASSERTION_TTL_SECS,
    };

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .context("service-account private key is not valid RSA PEM")?;
    let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
        .context("failed to sign token assertion")?;

    let response = http
        .post(&key.token_uri)
        .form(&[
            ("grant_type", JWT_BEARER_GRANT),
            ("assertion", assertion.as_str()),
        ])
        .send()
        .await
        .context("token request failed")?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("token endpoint rejected the assertion ({status}): {body}");
    }

    let token: TokenResponse = response
        .json()
        .await
        .context("malformed token endpoint response")?;
    tracing::debug!(account = %key.client_email, "obtained access token");
    Ok(token.access_token)
}
