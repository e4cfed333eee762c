//! Service-account credentials
//!
//! Loads a Google service-account key file and exchanges a signed JWT grant
//! for an OAuth access token. Tokens are cached for the lifetime of the
//! client, which is one request in the gateway.

use std::path::Path;
use std::time::{Duration, Instant};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{ClientError, Result};

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the token actually expires
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Subset of a service-account key file
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Reads and parses a key file
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            ClientError::Credentials(format!("failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&raw).map_err(|e| {
            ClientError::Credentials(format!("invalid key file {}: {}", path.display(), e))
        })
    }
}

#[derive(Debug, Serialize)]
struct GrantClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Access token with its local expiry
#[derive(Debug, Clone)]
pub struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Source of bearer tokens for API calls
pub enum TokenSource {
    /// Fixed token, e.g. for emulators or pre-minted credentials
    Static(String),
    ServiceAccount {
        key: ServiceAccountKey,
        signing_key: EncodingKey,
        cached: Mutex<Option<CachedToken>>,
    },
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenSource::Static(_) => f.write_str("TokenSource::Static(..)"),
            TokenSource::ServiceAccount { key, .. } => f
                .debug_struct("TokenSource::ServiceAccount")
                .field("client_email", &key.client_email)
                .finish(),
        }
    }
}

impl TokenSource {
    /// Builds a token source from a parsed key, validating the private key
    pub fn service_account(key: ServiceAccountKey) -> Result<Self> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| ClientError::Credentials(format!("invalid private key: {}", e)))?;

        Ok(Self::ServiceAccount {
            key,
            signing_key,
            cached: Mutex::new(None),
        })
    }

    /// Returns a valid access token, fetching a new one when needed
    pub async fn token(&self, http: &Client) -> Result<String> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::ServiceAccount {
                key,
                signing_key,
                cached,
            } => {
                let mut cached = cached.lock().await;
                if let Some(token) = cached.as_ref() {
                    if Instant::now() + EXPIRY_MARGIN < token.expires_at {
                        return Ok(token.value.clone());
                    }
                }

                let fresh = fetch_token(http, key, signing_key).await?;
                let value = fresh.value.clone();
                *cached = Some(fresh);
                Ok(value)
            }
        }
    }
}

fn sign_grant(key: &ServiceAccountKey, signing_key: &EncodingKey) -> Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = GrantClaims {
        iss: &key.client_email,
        scope: CLOUD_PLATFORM_SCOPE,
        aud: &key.token_uri,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    encode(&header, &claims, signing_key)
        .map_err(|e| ClientError::Credentials(format!("failed to sign token grant: {}", e)))
}

async fn fetch_token(
    http: &Client,
    key: &ServiceAccountKey,
    signing_key: &EncodingKey,
) -> Result<CachedToken> {
    let assertion = sign_grant(key, signing_key)?;

    tracing::debug!("Requesting access token for {}", key.client_email);

    let response = http
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClientError::Credentials(format!(
            "token exchange failed (status {}): {}",
            status.as_u16(),
            error_text
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse token response: {}", e)))?;

    let lifetime = Duration::from_secs(token.expires_in.unwrap_or(3600));
    Ok(CachedToken {
        value: token.access_token,
        expires_at: Instant::now() + lifetime,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{serve, service_account_key};
    use axum::{Form, Json, Router, http::StatusCode, routing::post};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_static_token() {
        let source = TokenSource::Static("ya29.test".to_string());
        let token = source.token(&Client::new()).await.unwrap();
        assert_eq!(token, "ya29.test");
    }

    #[tokio::test]
    async fn test_missing_key_file() {
        let err = ServiceAccountKey::from_file("/nonexistent/beans-sa.json")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Credentials(_)));
        assert!(err.to_string().contains("/nonexistent/beans-sa.json"));
    }

    #[test]
    fn test_key_defaults_token_uri() {
        let key: ServiceAccountKey = serde_json::from_str(
            r#"{"client_email": "runner@beans.iam.gserviceaccount.com", "private_key": "pem"}"#,
        )
        .unwrap();
        assert_eq!(key.token_uri, DEFAULT_TOKEN_URI);
        assert!(key.private_key_id.is_none());
    }

    #[test]
    fn test_rejects_malformed_private_key() {
        let key = ServiceAccountKey {
            client_email: "runner@beans.iam.gserviceaccount.com".to_string(),
            private_key: "not a pem".to_string(),
            private_key_id: None,
            token_uri: DEFAULT_TOKEN_URI.to_string(),
        };
        let err = TokenSource::service_account(key).unwrap_err();
        assert!(err.to_string().contains("invalid private key"));
    }

    #[tokio::test]
    async fn test_service_account_token_exchange() {
        let exchanges = Arc::new(AtomicUsize::new(0));
        let counter = exchanges.clone();
        let router = Router::new().route(
            "/token",
            post(move |Form(form): Form<HashMap<String, String>>| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    assert_eq!(form["grant_type"], JWT_BEARER_GRANT);

                    let header = jsonwebtoken::decode_header(&form["assertion"]).unwrap();
                    assert_eq!(header.alg, Algorithm::RS256);
                    assert_eq!(header.kid.as_deref(), Some("beans-test-key"));

                    Json(serde_json::json!({
                        "access_token": "ya29.exchanged",
                        "expires_in": 3599,
                        "token_type": "Bearer"
                    }))
                }
            }),
        );
        let base_url = serve(router).await;

        let source =
            TokenSource::service_account(service_account_key(format!("{}/token", base_url)))
                .unwrap();
        let http = Client::new();

        assert_eq!(source.token(&http).await.unwrap(), "ya29.exchanged");
        assert_eq!(source.token(&http).await.unwrap(), "ya29.exchanged");
        assert_eq!(exchanges.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rejected_token_exchange() {
        let router = Router::new().route(
            "/token",
            post(|| async { (StatusCode::BAD_REQUEST, "invalid_grant") }),
        );
        let base_url = serve(router).await;

        let source =
            TokenSource::service_account(service_account_key(format!("{}/token", base_url)))
                .unwrap();
        let err = source.token(&Client::new()).await.unwrap_err();

        assert!(matches!(err, ClientError::Credentials(_)));
        assert_eq!(
            err.to_string(),
            "Credentials error: token exchange failed (status 400): invalid_grant"
        );
    }
}
