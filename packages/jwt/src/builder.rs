//! Fluent JWT builder over [`crate::encode`]

use crate::error::{JwtError, JwtResult};
use serde::Serialize;
use serde_json::{Map, Value};

/// Default algorithm when none is configured
pub const DEFAULT_ALGORITHM: &str = "HS256";

/// JWT builder
///
/// ```
/// use svcauth_jwt::JwtBuilder;
///
/// let token = JwtBuilder::new()
///     .with_algorithm("HS256")
///     .with_secret(b"shared-secret")
///     .with_key_id("k1")
///     .encode(&serde_json::json!({"sub": "svc"}))
///     .unwrap();
/// assert_eq!(token.split('.').count(), 3);
/// ```
#[derive(Clone, Default)]
pub struct JwtBuilder {
    algorithm: Option<String>,
    key: Option<Vec<u8>>,
    key_id: Option<String>,
    header_fields: Map<String, Value>,
}

impl JwtBuilder {
    /// Create new JWT builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set algorithm
    #[inline]
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: &str) -> Self {
        self.algorithm = Some(algorithm.to_string());
        self
    }

    /// Set secret for HMAC algorithms
    #[inline]
    #[must_use]
    pub fn with_secret(mut self, secret: &[u8]) -> Self {
        self.key = Some(secret.to_vec());
        self
    }

    /// Set private key for RSA, ECDSA and EdDSA algorithms
    #[inline]
    #[must_use]
    pub fn with_private_key(mut self, key: &[u8]) -> Self {
        self.key = Some(key.to_vec());
        self
    }

    /// Set the `kid` header
    #[inline]
    #[must_use]
    pub fn with_key_id(mut self, kid: &str) -> Self {
        self.key_id = Some(kid.to_string());
        self
    }

    /// Add an extra header field. `typ`, `alg` and `kid` are computed and
    /// cannot be overridden this way.
    #[inline]
    #[must_use]
    pub fn with_header_field(mut self, name: &str, value: Value) -> Self {
        self.header_fields.insert(name.to_string(), value);
        self
    }

    /// Configured algorithm, or [`DEFAULT_ALGORITHM`]
    #[inline]
    #[must_use]
    pub fn algorithm(&self) -> &str {
        self.algorithm.as_deref().unwrap_or(DEFAULT_ALGORITHM)
    }

    /// Encode and sign `payload`
    ///
    /// # Errors
    /// Returns `JwtError::SigningFailure` if no key was set, otherwise any
    /// error from [`crate::encode`].
    pub fn encode<P: Serialize + ?Sized>(&self, payload: &P) -> JwtResult<String> {
        let key = self
            .key
            .as_deref()
            .ok_or_else(|| JwtError::signing_failure("No signing key configured"))?;
        let extra = (!self.header_fields.is_empty()).then_some(&self.header_fields);
        crate::encode(payload, key, self.algorithm(), self.key_id.as_deref(), extra)
    }
}

impl std::fmt::Debug for JwtBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtBuilder")
            .field("algorithm", &self.algorithm())
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("key_id", &self.key_id)
            .field("header_fields", &self.header_fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode_segments;
    use serde_json::json;

    #[test]
    fn test_defaults_to_hs256() {
        let builder = JwtBuilder::new().with_secret(b"secret");
        assert_eq!(builder.algorithm(), "HS256");
        let token = builder.encode(&json!({"a": 1})).unwrap();
        assert_eq!(decode_segments(&token).unwrap().header.alg(), Some("HS256"));
    }

    #[test]
    fn test_missing_key_fails() {
        assert!(matches!(
            JwtBuilder::new().encode(&json!({})),
            Err(JwtError::SigningFailure(_))
        ));
    }

    #[test]
    fn test_header_fields_do_not_override_alg() {
        let token = JwtBuilder::new()
            .with_algorithm("HS512")
            .with_secret(b"secret")
            .with_key_id("k1")
            .with_header_field("alg", json!("none"))
            .with_header_field("cty", json!("JWT"))
            .encode(&json!({}))
            .unwrap();
        let header = decode_segments(&token).unwrap().header;
        assert_eq!(header.alg(), Some("HS512"));
        assert_eq!(header.kid(), Some("k1"));
        assert_eq!(header.get("cty"), Some(&json!("JWT")));
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", JwtBuilder::new().with_secret(b"top-secret"));
        assert!(!rendered.contains("top-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
