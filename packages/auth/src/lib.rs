//! OAuth2 JWT-bearer authentication for service accounts
//!
//! A [`Credential`] signs a short-lived RS256 assertion, which the
//! [`TokenExchanger`] trades for a bearer access token. A
//! [`ServiceAccountSession`] ties the two together and owns the token.
//!
//! ```no_run
//! use svcauth::{AuthConfig, Credential, ServiceAccountSession};
//!
//! # async fn run() -> svcauth::AuthResult<()> {
//! let credential = Credential::from_file("service-account.json")?;
//! let config = AuthConfig::default().with_env_overrides()?;
//! let session = ServiceAccountSession::connect(credential, &config).await?;
//! let header = session.bearer_header()?;
//! # let _ = header;
//! # Ok(())
//! # }
//! ```

pub mod assertion;
pub mod clock;
pub mod config;
pub mod credential;
mod error;
pub mod exchange;
pub mod logging;
pub mod session;

pub use assertion::{ASSERTION_ALGORITHM, AssertionBuilder, ServiceAccountClaims};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AuthConfig;
pub use credential::Credential;
pub use error::*;
pub use exchange::{AccessToken, JWT_BEARER_GRANT_TYPE, TokenExchanger, TokenResponse};
pub use session::ServiceAccountSession;
pub use svcauth_jwt;
