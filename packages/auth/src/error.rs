//! Authentication error types

use svcauth_jwt::JwtError;

/// Authentication result type
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors raised while loading credentials or acquiring an access token
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The service-account credential is missing fields or is not valid JSON
    #[error("Invalid credential: {0}")]
    Credential(String),
    /// Configuration could not be loaded or an override could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),
    /// A credential or configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The assertion could not be encoded or signed
    #[error("Assertion signing failed: {0}")]
    Jwt(#[from] JwtError),
    /// The request failed before the token endpoint answered
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The token endpoint answered with a status other than 200
    #[error("Token exchange failed with status {status}: {body}")]
    TokenExchange {
        /// HTTP status code
        status: u16,
        /// Response body as received
        body: String,
    },
    /// A 200 response that carries no usable access token
    #[error("Invalid token response: {0}")]
    InvalidTokenResponse(String),
    /// An authenticated operation was requested while no token is held
    #[error("Not authenticated: no access token available")]
    NotAuthenticated,
}

impl AuthError {
    /// Create a credential error
    #[inline]
    #[must_use]
    pub fn credential(msg: &str) -> Self {
        AuthError::Credential(msg.to_string())
    }

    /// Create a configuration error
    #[inline]
    #[must_use]
    pub fn config(msg: &str) -> Self {
        AuthError::Config(msg.to_string())
    }

    /// Create an invalid token response error
    #[inline]
    #[must_use]
    pub fn invalid_token_response(msg: &str) -> Self {
        AuthError::InvalidTokenResponse(msg.to_string())
    }

    /// Whether this is a rejection from the token endpoint, as opposed to a
    /// local failure
    #[must_use]
    pub fn is_exchange_rejection(&self) -> bool {
        matches!(self, AuthError::TokenExchange { .. })
    }
}
