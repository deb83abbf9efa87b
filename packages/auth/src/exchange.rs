//! Exchange of a signed assertion for a bearer access token

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::logging::fingerprint;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{error, info};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// `grant_type` for the JWT-bearer flow (RFC 7523)
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Body of a successful token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Bearer token
    pub access_token: String,
    /// Usually `Bearer`
    #[serde(default)]
    pub token_type: Option<String>,
    /// Token lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    /// Turn the response into a held token issued at `issued_at` (seconds
    /// since the epoch). Without `expires_in`, `default_lifetime_secs`
    /// applies.
    #[must_use]
    pub fn into_access_token(self, issued_at: i64, default_lifetime_secs: i64) -> AccessToken {
        let lifetime = self.expires_in.unwrap_or(default_lifetime_secs);
        AccessToken {
            token: self.access_token,
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            issued_at,
            expires_at: issued_at.saturating_add(lifetime),
        }
    }
}

/// A bearer access token and its validity window
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AccessToken {
    token: String,
    token_type: String,
    #[zeroize(skip)]
    issued_at: i64,
    #[zeroize(skip)]
    expires_at: i64,
}

impl AccessToken {
    /// Token value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Token type reported by the endpoint
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Issue time, seconds since the epoch
    #[must_use]
    pub fn issued_at(&self) -> i64 {
        self.issued_at
    }

    /// Expiry, seconds since the epoch
    #[must_use]
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Whether the token is stale at `now`. Nothing refreshes it; callers
    /// decide when to authenticate again.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expires_at
    }

    /// `Authorization` header value
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &fingerprint(&self.token))
            .field("token_type", &self.token_type)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// POSTs assertions to the OAuth2 token endpoint
///
/// One request per call. No retry or backoff.
#[derive(Clone, Debug)]
pub struct TokenExchanger {
    client: Client,
    endpoint: String,
}

impl TokenExchanger {
    /// Exchanger for the endpoint, user agent and timeout in `config`
    ///
    /// # Errors
    /// `AuthError::Transport` if the HTTP client cannot be initialized.
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, &config.token_endpoint))
    }

    /// Exchanger over an existing client
    #[must_use]
    pub fn with_client(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }

    /// Token endpoint URL
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Exchange `assertion` for an access token
    ///
    /// # Errors
    /// - `AuthError::Transport` if no response was received, or a 200 body
    ///   could not be read
    /// - `AuthError::TokenExchange` for any status other than 200, logged
    ///   with status and body
    /// - `AuthError::InvalidTokenResponse` if a 200 body has no
    ///   `access_token`
    pub async fn exchange(&self, assertion: &str) -> AuthResult<TokenResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Cache-Control", "no-store")
            .form(&[("grant_type", JWT_BEARER_GRANT_TYPE), ("assertion", assertion)])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            // body is best effort once the status has failed
            let body = response.text().await.unwrap_or_default();
            error!(
                endpoint = %self.endpoint,
                status = status.as_u16(),
                body = %body,
                "Error getting access token"
            );
            return Err(AuthError::TokenExchange {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::InvalidTokenResponse(format!("{e}")))?;
        if token.access_token.is_empty() {
            return Err(AuthError::invalid_token_response("empty access_token"));
        }

        info!(
            endpoint = %self.endpoint,
            token = %fingerprint(&token.access_token),
            expires_in = ?token.expires_in,
            "Obtained access token"
        );
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_without_expiry_uses_default_lifetime() {
        let response: TokenResponse = serde_json::from_str(r#"{"access_token": "ya29.x"}"#).unwrap();
        let token = response.into_access_token(100, 3660);
        assert_eq!(token.as_str(), "ya29.x");
        assert_eq!(token.token_type(), "Bearer");
        assert_eq!(token.expires_at(), 3760);
        assert_eq!(token.bearer_header(), "Bearer ya29.x");
    }

    #[test]
    fn test_expiry_check() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token": "t", "token_type": "Bearer", "expires_in": 10}"#,
        )
        .unwrap();
        let token = response.into_access_token(1_000, 3660);
        let at = |s: i64| DateTime::from_timestamp(s, 0).unwrap();
        assert!(!token.is_expired_at(at(1_009)));
        assert!(token.is_expired_at(at(1_010)));
    }

    #[test]
    fn test_debug_hides_token() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token": "very-secret-token"}"#).unwrap();
        let rendered = format!("{:?}", response.into_access_token(0, 1));
        assert!(!rendered.contains("very-secret-token"));
    }
}
