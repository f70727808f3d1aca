//! # OAuth2 Token Client
//!
//! Exchanges a long-lived refresh token for a short-lived access token used
//! for XOAUTH2 SMTP login.
//!
//! Every failure here counts as a failed transport setup, which lets the
//! delivery service fall back to the next strategy.
//!
//! # Examples
//!
//! ```ignore
//! use limo_quote::infrastructure::mail::oauth::OAuthTokenClient;
//!
//! let client = OAuthTokenClient::new("https://oauth2.googleapis.com/token", 5000)?;
//! let token = client.refresh_access_token(&credentials).await?;
//! ```

use crate::infrastructure::mail::config::OAuth2Credentials;
use crate::infrastructure::mail::error::{DeliveryError, DeliveryResult};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// A short-lived OAuth2 access token.
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
    expires_in_secs: Option<u64>,
}

impl AccessToken {
    /// Returns the bearer token.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Lifetime reported by the token endpoint.
    #[must_use]
    pub fn expires_in_secs(&self) -> Option<u64> {
        self.expires_in_secs
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("expires_in_secs", &self.expires_in_secs)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// HTTP client for the OAuth2 token endpoint.
#[derive(Debug, Clone)]
pub struct OAuthTokenClient {
    client: Client,
    token_url: String,
}

impl OAuthTokenClient {
    /// Creates a token client.
    ///
    /// # Arguments
    ///
    /// * `token_url` - The provider's token endpoint.
    /// * `timeout_ms` - Request timeout in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::Unknown` if the HTTP client cannot be created.
    pub fn new(token_url: impl Into<String>, timeout_ms: u64) -> DeliveryResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| DeliveryError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token_url: token_url.into(),
        })
    }

    /// Returns the token endpoint.
    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Exchanges a refresh token for an access token.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::AuthFailure` if the endpoint rejects the
    /// credentials, `DeliveryError::Timeout` or
    /// `DeliveryError::NetworkUnreachable` for transport problems, and
    /// `DeliveryError::Unknown` for unexpected responses.
    pub async fn refresh_access_token(
        &self,
        credentials: &OAuth2Credentials,
    ) -> DeliveryResult<AccessToken> {
        let form = [
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("refresh_token", credentials.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status.is_success() {
            let body: TokenResponse = response.json().await.map_err(|e| {
                DeliveryError::unknown(format!("Failed to parse token response: {e}"))
            })?;
            return Ok(AccessToken {
                secret: body.access_token,
                expires_in_secs: body.expires_in,
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_status_error(status, &body))
    }
}

fn map_reqwest_error(error: reqwest::Error) -> DeliveryError {
    if error.is_timeout() {
        DeliveryError::timeout(format!("Token request timed out: {error}"))
    } else if error.is_connect() {
        DeliveryError::network_unreachable(format!("Token endpoint unreachable: {error}"))
    } else {
        DeliveryError::unknown(format!("Token request failed: {error}"))
    }
}

fn map_status_error(status: StatusCode, body: &str) -> DeliveryError {
    let detail = serde_json::from_str::<TokenErrorResponse>(body)
        .map(|e| match e.error_description {
            Some(description) => format!("{}: {}", e.error, description),
            None => e.error,
        })
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            DeliveryError::auth_failure(format!("Token exchange rejected ({status}): {detail}"))
                .with_code("EAUTH")
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            DeliveryError::timeout(format!("Token endpoint timed out ({status})"))
        }
        _ => DeliveryError::unknown(format!("Token endpoint error ({status}): {detail}"))
            .with_code(status.as_u16().to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::mail::error::DeliveryErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> OAuth2Credentials {
        OAuth2Credentials {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            refresh_token: "refresh".to_string(),
        }
    }

    async fn client_for(server: &MockServer) -> OAuthTokenClient {
        OAuthTokenClient::new(format!("{}/token", server.uri()), 2000).unwrap()
    }

    #[tokio::test]
    async fn exchanges_refresh_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "ya29.token",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = client_for(&server)
            .await
            .refresh_access_token(&credentials())
            .await
            .unwrap();

        assert_eq!(token.secret(), "ya29.token");
        assert_eq!(token.expires_in_secs(), Some(3599));
        assert!(!format!("{token:?}").contains("ya29"));
    }

    #[tokio::test]
    async fn revoked_token_is_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Token has been expired or revoked."
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .refresh_access_token(&credentials())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), DeliveryErrorKind::AuthFailure);
        assert!(err.message().contains("invalid_grant"));
        assert_eq!(err.provider_code(), Some("EAUTH"));
    }

    #[tokio::test]
    async fn server_error_is_unknown_with_status_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .refresh_access_token(&credentials())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), DeliveryErrorKind::Unknown);
        assert_eq!(err.provider_code(), Some("503"));
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "late"}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = OAuthTokenClient::new(format!("{}/token", server.uri()), 50).unwrap();
        let err = client.refresh_access_token(&credentials()).await.unwrap_err();
        assert_eq!(err.kind(), DeliveryErrorKind::Timeout);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        // Nothing listens on port 9 (discard) on test hosts.
        let client = OAuthTokenClient::new("http://127.0.0.1:9/token", 2000).unwrap();
        let err = client.refresh_access_token(&credentials()).await.unwrap_err();
        assert_eq!(err.kind(), DeliveryErrorKind::NetworkUnreachable);
    }
}
