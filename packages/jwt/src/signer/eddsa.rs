//! EdDSA (Ed25519) signing
//!
//! Key material is multi-line text; the last non-empty line holds the
//! base64-encoded signing key, with or without `=` padding. That line may
//! carry either a 32-byte seed or a 64-byte libsodium secret key (seed
//! followed by the public key).

use crate::error::{JwtError, JwtResult};

/// Last non-empty line of `key`, trimmed
#[cfg_attr(not(feature = "eddsa"), allow(dead_code))]
pub(crate) fn key_line(key: &[u8]) -> JwtResult<&str> {
    let text = std::str::from_utf8(key)
        .map_err(|_| JwtError::signing_failure("EdDSA key is not valid UTF-8"))?;
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .next_back()
        .ok_or_else(|| JwtError::signing_failure("EdDSA key is empty"))
}

// Standard alphabet; `=` padding optional
#[cfg(feature = "eddsa")]
const KEY_LINE_ENGINE: base64::engine::GeneralPurpose = base64::engine::GeneralPurpose::new(
    &base64::alphabet::STANDARD,
    base64::engine::general_purpose::PAD
        .with_decode_padding_mode(base64::engine::DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

#[cfg(feature = "eddsa")]
pub(crate) fn sign(message: &[u8], key: &[u8]) -> JwtResult<Vec<u8>> {
    use base64::Engine as _;
    use ed25519_dalek::{SECRET_KEY_LENGTH, Signer, SigningKey};

    let decoded = KEY_LINE_ENGINE
        .decode(key_line(key)?)
        .map_err(|e| JwtError::SigningFailure(format!("EdDSA key is not base64: {e}")))?;

    let signing_key = match decoded.len() {
        SECRET_KEY_LENGTH => {
            let mut seed = [0u8; SECRET_KEY_LENGTH];
            seed.copy_from_slice(&decoded);
            SigningKey::from_bytes(&seed)
        }
        64 => {
            let mut keypair = [0u8; 64];
            keypair.copy_from_slice(&decoded);
            SigningKey::from_keypair_bytes(&keypair)
                .map_err(|e| JwtError::SigningFailure(format!("Invalid Ed25519 keypair: {e}")))?
        }
        other => {
            return Err(JwtError::SigningFailure(format!(
                "Ed25519 key must be 32 or 64 bytes, got {other}"
            )));
        }
    };

    Ok(signing_key.sign(message).to_bytes().to_vec())
}

#[cfg(not(feature = "eddsa"))]
pub(crate) fn sign(_message: &[u8], _key: &[u8]) -> JwtResult<Vec<u8>> {
    Err(JwtError::unavailable_primitive(
        "EdDSA support is not compiled in (enable the `eddsa` feature)",
    ))
}
