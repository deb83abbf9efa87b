//! Signature dispatch
//!
//! `sign` looks the algorithm up in the registry and hands the message to the
//! matching family. ECDSA output is converted from DER to raw `r || s`
//! before it is returned. Nothing here holds state, so concurrent callers
//! need no synchronization.

mod ecdsa;
mod eddsa;
mod hmac;
mod rsa;

use crate::algorithms::{self, Algorithm, Family};
use crate::error::{JwtError, JwtResult};
use crate::signature_codec::signature_from_der;

/// Sign `message` with `key` under the algorithm named by `alg`.
///
/// For HMAC the key is the shared secret. For RSA and ECDSA it is a private
/// key, PEM or PKCS#8 DER. For EdDSA it is text whose last non-empty line is
/// the base64 signing key.
///
/// # Errors
/// - `JwtError::UnsupportedAlgorithm` if `alg` is not in the registry
/// - `JwtError::SigningFailure` if the key is malformed or does not match
/// - `JwtError::UnavailablePrimitive` if EdDSA support is not compiled in
/// - `JwtError::MalformedDer` if an ECDSA primitive returns a bad signature
pub fn sign(message: &[u8], key: &[u8], alg: &str) -> JwtResult<Vec<u8>> {
    let (algorithm, _) = algorithms::lookup(alg)?;
    sign_with(message, key, algorithm)
}

/// Sign with an already-resolved algorithm
///
/// # Errors
/// Same as [`sign`], minus the registry lookup.
pub fn sign_with(message: &[u8], key: &[u8], algorithm: Algorithm) -> JwtResult<Vec<u8>> {
    let descriptor = algorithm.descriptor();

    let signature = match descriptor.family {
        Family::Hmac => hmac::sign(descriptor.digest, message, key)?,
        Family::AsymmetricDigest => match algorithm {
            Algorithm::ES256 => {
                let der = ecdsa::sign_es256_der(message, key)?;
                signature_from_der(&der, 256)?
            }
            Algorithm::ES384 => {
                let der = ecdsa::sign_es384_der(message, key)?;
                signature_from_der(&der, 384)?
            }
            _ => rsa::sign(descriptor.digest, message, key)?,
        },
        Family::EdDsa => eddsa::sign(message, key)?,
    };

    if let Some(expected) = algorithm.signature_len()
        && signature.len() != expected
    {
        return Err(JwtError::SigningFailure(format!(
            "{algorithm} produced {} signature bytes, expected {expected}",
            signature.len()
        )));
    }

    tracing::trace!(alg = %algorithm, len = signature.len(), "message signed");
    Ok(signature)
}

// PEM keys are ASCII; anything that does not look like PEM is treated as DER.
fn key_text(key: &[u8]) -> Option<&str> {
    std::str::from_utf8(key)
        .ok()
        .map(str::trim_start)
        .filter(|text| text.starts_with("-----BEGIN"))
}
