//! Service-account credential
//!
//! Parsed from the JSON key file issued for a service account. Only
//! `client_email`, `private_key` and `token_uri` are required; the other
//! fields commonly present in such files are kept when found.

use crate::error::{AuthError, AuthResult};
use serde::Deserialize;
use std::path::Path;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Deserialize)]
struct RawCredential {
    #[serde(rename = "type")]
    account_type: Option<String>,
    project_id: Option<String>,
    private_key_id: Option<String>,
    client_email: Option<String>,
    private_key: Option<String>,
    token_uri: Option<String>,
}

/// Service-account identity and signing key
///
/// Immutable once loaded. The key material is wiped when dropped and is
/// never printed by `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    client_email: String,
    private_key: String,
    token_uri: String,
    private_key_id: Option<String>,
    project_id: Option<String>,
    account_type: Option<String>,
}

impl Credential {
    /// Build a credential from its required parts
    ///
    /// # Errors
    /// Returns `AuthError::Credential` if any part is empty.
    pub fn new(client_email: &str, private_key: &str, token_uri: &str) -> AuthResult<Self> {
        Ok(Self {
            client_email: required("client_email", Some(client_email.to_string()))?,
            private_key: required("private_key", Some(private_key.to_string()))?,
            token_uri: required("token_uri", Some(token_uri.to_string()))?,
            private_key_id: None,
            project_id: None,
            account_type: None,
        })
    }

    /// Parse a JSON key file's contents
    ///
    /// # Errors
    /// Returns `AuthError::Credential` if the text is not a JSON object or a
    /// required field is missing, empty or not a string.
    pub fn from_json(json: &str) -> AuthResult<Self> {
        let raw: RawCredential = serde_json::from_str(json)
            .map_err(|e| AuthError::Credential(format!("Malformed credential JSON: {e}")))?;

        Ok(Self {
            client_email: required("client_email", raw.client_email)?,
            private_key: required("private_key", raw.private_key)?,
            token_uri: required("token_uri", raw.token_uri)?,
            private_key_id: raw.private_key_id.filter(|s| !s.is_empty()),
            project_id: raw.project_id.filter(|s| !s.is_empty()),
            account_type: raw.account_type,
        })
    }

    /// Read and parse a JSON key file
    ///
    /// # Errors
    /// Returns `AuthError::Io` if the file cannot be read, otherwise any
    /// error from [`Credential::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> AuthResult<Self> {
        let mut contents = std::fs::read_to_string(path)?;
        let parsed = Self::from_json(&contents);
        contents.zeroize();
        parsed
    }

    /// Issuer identity (`iss` claim)
    #[must_use]
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// PEM-encoded private key
    #[must_use]
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Token endpoint URL, used as the `aud` claim
    #[must_use]
    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    /// Identifier of the private key, if the key file names one
    #[must_use]
    pub fn private_key_id(&self) -> Option<&str> {
        self.private_key_id.as_deref()
    }

    /// Owning project, if present
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Value of the key file's `type` field, normally `service_account`
    #[must_use]
    pub fn account_type(&self) -> Option<&str> {
        self.account_type.as_deref()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .field("private_key_id", &self.private_key_id)
            .field("project_id", &self.project_id)
            .field("account_type", &self.account_type)
            .finish()
    }
}

fn required(field: &str, value: Option<String>) -> AuthResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(AuthError::Credential(format!("Field `{field}` is empty"))),
        None => Err(AuthError::Credential(format!("Missing field `{field}`"))),
    }
}
