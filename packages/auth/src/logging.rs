//! Logging setup and redaction helpers
//!
//! Library code logs through `tracing`, whose `log` feature forwards every
//! event to `env_logger` when no subscriber is installed. Levels come from
//! `RUST_LOG`, e.g. `RUST_LOG=svcauth=debug`.

use sha2::{Digest, Sha256};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize `env_logger` once per process. Later calls are no-ops.
pub fn init() {
    INIT_LOGGER.call_once(|| {
        env_logger::Builder::from_default_env()
            .format_timestamp_micros()
            .init();

        log::debug!("Structured logging initialized");
    });
}

/// Initialize logging for tests; tolerates an already-installed logger
pub fn init_test() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .try_init();
}

/// Short SHA-256 fingerprint for logging identities and tokens without
/// writing them in clear. Always `#` followed by 12 hex digits.
#[must_use]
pub fn fingerprint(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    let hex = hex::encode(&digest[..6]);
    format!("#{hex}")
}
