//! JWT type definitions

use crate::algorithms::Algorithm;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JOSE header of an outgoing token
///
/// Field order is preserved, so a header built from the same inputs always
/// serializes to the same bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JwtHeader(Map<String, Value>);

impl JwtHeader {
    /// Header with `typ: "JWT"` and the given `alg`
    #[must_use]
    pub fn new(alg: Algorithm) -> Self {
        Self::compose(alg, None, None)
    }

    /// Merge caller-supplied fields with the computed ones.
    ///
    /// Extra fields go in first; `typ`, `alg` and (when given) `kid` are
    /// written last and win on collision.
    #[must_use]
    pub fn compose(alg: Algorithm, kid: Option<&str>, extra: Option<&Map<String, Value>>) -> Self {
        let mut fields = extra.cloned().unwrap_or_default();
        fields.insert("typ".to_string(), Value::String("JWT".to_string()));
        fields.insert("alg".to_string(), Value::String(alg.as_str().to_string()));
        if let Some(kid) = kid {
            fields.insert("kid".to_string(), Value::String(kid.to_string()));
        }
        Self(fields)
    }

    /// Set the key id
    #[must_use]
    pub fn with_key_id(mut self, kid: &str) -> Self {
        self.0
            .insert("kid".to_string(), Value::String(kid.to_string()));
        self
    }

    /// `alg` header value
    #[must_use]
    pub fn alg(&self) -> Option<&str> {
        self.get_str("alg")
    }

    /// `typ` header value
    #[must_use]
    pub fn typ(&self) -> Option<&str> {
        self.get_str("typ")
    }

    /// `kid` header value
    #[must_use]
    pub fn kid(&self) -> Option<&str> {
        self.get_str("kid")
    }

    /// Any header field
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// All header fields in serialization order
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }
}

/// A compact JWT split into its decoded parts. Nothing is verified.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedJwt {
    /// Decoded header
    pub header: JwtHeader,
    /// Decoded payload
    pub payload: Value,
    /// Raw signature bytes
    pub signature: Vec<u8>,
}
