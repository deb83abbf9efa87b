//! JWT signing error types

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// Errors raised while building or signing a JWT
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JwtError {
    /// Algorithm identifier is not in the registry
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// The cryptographic primitive rejected the key or message
    #[error("Signing failed: {0}")]
    SigningFailure(String),
    /// The primitive needed for this algorithm is not compiled in
    #[error("Primitive unavailable: {0}")]
    UnavailablePrimitive(String),
    /// A DER-encoded ECDSA signature could not be decoded
    #[error("Malformed DER signature: {0}")]
    MalformedDer(String),
    /// Header or payload could not be serialized to JSON
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// A compact JWT could not be split or decoded
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
}

impl JwtError {
    /// Create an unsupported algorithm error
    #[inline]
    #[must_use]
    pub fn unsupported_algorithm(alg: &str) -> Self {
        JwtError::UnsupportedAlgorithm(alg.to_string())
    }

    /// Create a signing failure error
    #[inline]
    #[must_use]
    pub fn signing_failure(msg: &str) -> Self {
        JwtError::SigningFailure(msg.to_string())
    }

    /// Create an unavailable primitive error
    #[inline]
    #[must_use]
    pub fn unavailable_primitive(msg: &str) -> Self {
        JwtError::UnavailablePrimitive(msg.to_string())
    }

    /// Create a malformed DER error
    #[inline]
    #[must_use]
    pub fn malformed_der(msg: &str) -> Self {
        JwtError::MalformedDer(msg.to_string())
    }

    /// Create a serialization error
    #[inline]
    #[must_use]
    pub fn serialization(msg: &str) -> Self {
        JwtError::Serialization(msg.to_string())
    }

    /// Create an invalid token error
    #[inline]
    #[must_use]
    pub fn invalid_token(msg: &str) -> Self {
        JwtError::InvalidToken(msg.to_string())
    }
}

impl From<serde_json::Error> for JwtError {
    fn from(err: serde_json::Error) -> Self {
        JwtError::Serialization(err.to_string())
    }
}
