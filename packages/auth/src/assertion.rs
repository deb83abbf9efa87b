//! Signed JWT-bearer assertions for a service account

use crate::clock::{Clock, SystemClock};
use crate::config::{AuthConfig, DEFAULT_ASSERTION_LIFETIME_SECS, DEFAULT_SCOPES};
use crate::credential::Credential;
use crate::error::AuthResult;
use crate::logging::fingerprint;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use svcauth_jwt::Algorithm;
use tracing::debug;

/// Assertions are always signed with RS256
pub const ASSERTION_ALGORITHM: Algorithm = Algorithm::RS256;

/// Claim set of a bearer assertion, serialized in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccountClaims {
    /// Service-account email
    pub iss: String,
    /// Expiry, seconds since the epoch
    pub exp: i64,
    /// Issue time, seconds since the epoch
    pub iat: i64,
    /// Token endpoint the assertion is meant for
    pub aud: String,
    /// Space-separated scopes
    pub scope: String,
}

/// Builds fresh assertions from one credential
#[derive(Clone)]
pub struct AssertionBuilder {
    credential: Credential,
    scope: String,
    lifetime_secs: i64,
    clock: Arc<dyn Clock>,
}

impl AssertionBuilder {
    /// Builder with the default scopes, lifetime and the system clock
    #[must_use]
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            scope: DEFAULT_SCOPES.join(" "),
            lifetime_secs: DEFAULT_ASSERTION_LIFETIME_SECS,
            clock: Arc::new(SystemClock),
        }
    }

    /// Builder taking scopes and lifetime from `config`
    #[must_use]
    pub fn from_config(credential: Credential, config: &AuthConfig) -> Self {
        Self::new(credential)
            .with_scope(&config.scope_claim())
            .with_lifetime_secs(config.assertion_lifetime_secs)
    }

    /// Replace the `scope` claim value
    #[must_use]
    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scope = scope.to_string();
        self
    }

    /// Replace the validity window
    #[must_use]
    pub fn with_lifetime_secs(mut self, secs: i64) -> Self {
        self.lifetime_secs = secs;
        self
    }

    /// Replace the time source
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Credential the assertions are issued for
    #[must_use]
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Validity window in seconds
    #[must_use]
    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Claim set for an assertion issued now
    #[must_use]
    pub fn claims(&self) -> ServiceAccountClaims {
        let iat = self.clock.now().timestamp();
        ServiceAccountClaims {
            iss: self.credential.client_email().to_string(),
            exp: iat.saturating_add(self.lifetime_secs),
            iat,
            aud: self.credential.token_uri().to_string(),
            scope: self.scope.clone(),
        }
    }

    /// Sign a fresh assertion
    ///
    /// # Errors
    /// `AuthError::Jwt` if the private key cannot sign RS256.
    pub fn build(&self) -> AuthResult<String> {
        self.sign(&self.claims())
    }

    /// Sign a given claim set with the credential's key
    ///
    /// # Errors
    /// `AuthError::Jwt` if the private key cannot sign RS256.
    pub fn sign(&self, claims: &ServiceAccountClaims) -> AuthResult<String> {
        let assertion = svcauth_jwt::encode(
            claims,
            self.credential.private_key().as_bytes(),
            ASSERTION_ALGORITHM.as_str(),
            None,
            None,
        )?;
        debug!(
            issuer = %fingerprint(&claims.iss),
            iat = claims.iat,
            exp = claims.exp,
            "Built service-account assertion"
        );
        Ok(assertion)
    }
}

impl std::fmt::Debug for AssertionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssertionBuilder")
            .field("credential", &self.credential)
            .field("scope", &self.scope)
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}
