//! `svcauth-token`: print an access token for a service account

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use svcauth::svcauth_jwt::decode_segments;
use svcauth::{AssertionBuilder, AuthConfig, AuthResult, Credential, ServiceAccountSession};

#[derive(Parser)]
#[command(name = "svcauth-token")]
#[command(about = "Exchange a service-account key for an OAuth2 access token")]
#[command(version)]
struct Cli {
    /// Service-account JSON key file
    #[arg(long, short = 'c', env = "SVCAUTH_CREDENTIALS")]
    credentials: PathBuf,

    /// JSON config file; `SVCAUTH_*` variables override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Token endpoint, overriding config and environment
    #[arg(long)]
    endpoint: Option<String>,

    /// Requested scope; repeat for several
    #[arg(long = "scope", short = 's')]
    scopes: Vec<String>,

    /// Print the signed assertion and its decoded claims instead of
    /// exchanging it
    #[arg(long)]
    assertion_only: bool,
}

impl Cli {
    fn load_config(&self) -> AuthResult<AuthConfig> {
        let base = match &self.config {
            Some(path) => AuthConfig::from_file(path)?,
            None => AuthConfig::default(),
        };
        let mut config = base.with_env_overrides()?;
        if let Some(endpoint) = &self.endpoint {
            config.token_endpoint.clone_from(endpoint);
        }
        if !self.scopes.is_empty() {
            config.scopes.clone_from(&self.scopes);
        }
        config.validate()?;
        Ok(config)
    }
}

async fn run(cli: Cli) -> AuthResult<()> {
    let config = cli.load_config()?;
    let credential = Credential::from_file(&cli.credentials)?;

    if cli.assertion_only {
        let assertion = AssertionBuilder::from_config(credential, &config).build()?;
        let decoded = decode_segments(&assertion)?;
        println!("{assertion}");
        println!(
            "{}",
            serde_json::to_string_pretty(&decoded.payload)
                .map_err(svcauth::svcauth_jwt::JwtError::from)?
        );
        return Ok(());
    }

    let session = ServiceAccountSession::new(credential, &config)?;
    let token = session.authenticate().await?;
    println!("{}", token.as_str());
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    svcauth::logging::init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("svcauth-token: {e}");
            ExitCode::FAILURE
        }
    }
}
