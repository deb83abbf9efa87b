//! Service-account session owning the current access token

use crate::assertion::AssertionBuilder;
use crate::config::AuthConfig;
use crate::credential::Credential;
use crate::error::{AuthError, AuthResult};
use crate::exchange::{AccessToken, TokenExchanger};
use crate::logging::fingerprint;
use arc_swap::ArcSwapOption;
use std::sync::Arc;
use tracing::{error, info};

/// Authenticated identity for calls against the storage API
///
/// The token slot starts empty and is filled by a successful
/// [`authenticate`](Self::authenticate). Readers never block. Concurrent
/// `authenticate` calls are not serialized; the last one to finish wins.
#[derive(Debug)]
pub struct ServiceAccountSession {
    assertions: AssertionBuilder,
    exchanger: TokenExchanger,
    token: ArcSwapOption<AccessToken>,
}

impl ServiceAccountSession {
    /// Session with an empty token slot. No request is made.
    ///
    /// # Errors
    /// `AuthError::Config` if `config` is invalid, `AuthError::Transport` if
    /// the HTTP client cannot be built.
    pub fn new(credential: Credential, config: &AuthConfig) -> AuthResult<Self> {
        config.validate()?;
        let exchanger = TokenExchanger::new(config)?;
        Ok(Self::from_parts(
            AssertionBuilder::from_config(credential, config),
            exchanger,
        ))
    }

    /// Session over a prepared builder and exchanger
    #[must_use]
    pub fn from_parts(assertions: AssertionBuilder, exchanger: TokenExchanger) -> Self {
        Self {
            assertions,
            exchanger,
            token: ArcSwapOption::empty(),
        }
    }

    /// Create a session and make one exchange attempt.
    ///
    /// A failed exchange is logged and the session is still returned with no
    /// token; check [`access_token`](Self::access_token) before making
    /// authenticated calls.
    ///
    /// # Errors
    /// Only the construction errors of [`ServiceAccountSession::new`].
    pub async fn connect(credential: Credential, config: &AuthConfig) -> AuthResult<Self> {
        let session = Self::new(credential, config)?;
        if let Err(e) = session.authenticate().await {
            error!(
                issuer = %fingerprint(session.assertions.credential().client_email()),
                error = %e,
                "Unable to initialize service-account session"
            );
        }
        Ok(session)
    }

    /// Build and sign a fresh assertion, exchange it, and store the token.
    ///
    /// On failure the slot is left as it was.
    ///
    /// # Errors
    /// Any signing or exchange error.
    pub async fn authenticate(&self) -> AuthResult<Arc<AccessToken>> {
        let claims = self.assertions.claims();
        let assertion = self.assertions.sign(&claims)?;
        let response = self.exchanger.exchange(&assertion).await?;

        let token = Arc::new(
            response.into_access_token(claims.iat, self.assertions.lifetime_secs()),
        );
        self.token.store(Some(Arc::clone(&token)));
        info!(
            issuer = %fingerprint(&claims.iss),
            expires_at = token.expires_at(),
            "Service-account session authenticated"
        );
        Ok(token)
    }

    /// Current token, if any
    #[must_use]
    pub fn access_token(&self) -> Option<Arc<AccessToken>> {
        self.token.load_full()
    }

    /// Current token
    ///
    /// # Errors
    /// `AuthError::NotAuthenticated` while the slot is empty.
    pub fn require_token(&self) -> AuthResult<Arc<AccessToken>> {
        self.access_token().ok_or(AuthError::NotAuthenticated)
    }

    /// `Authorization` header value for the current token
    ///
    /// # Errors
    /// `AuthError::NotAuthenticated` while the slot is empty.
    pub fn bearer_header(&self) -> AuthResult<String> {
        Ok(self.require_token()?.bearer_header())
    }

    /// Whether a token is held
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.load().is_some()
    }

    /// Drop the held token
    pub fn clear(&self) {
        self.token.store(None);
    }

    /// Assertion builder used by this session
    #[must_use]
    pub fn assertions(&self) -> &AssertionBuilder {
        &self.assertions
    }

    /// Exchanger used by this session
    #[must_use]
    pub fn exchanger(&self) -> &TokenExchanger {
        &self.exchanger
    }
}
