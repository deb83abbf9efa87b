//! ECDSA-based signing (ES256, ES384)
//!
//! Signatures come out of the primitive in DER, the same shape OpenSSL
//! emits. The dispatcher converts them to raw `r || s`.

use super::key_text;
use crate::error::{JwtError, JwtResult};
use p256::ecdsa::signature::Signer;

/// Sign with ECDSA P-256 (ES256), returning the DER signature
pub(crate) fn sign_es256_der(message: &[u8], key: &[u8]) -> JwtResult<Vec<u8>> {
    use p256::pkcs8::DecodePrivateKey;
    use p256::{SecretKey, ecdsa::Signature, ecdsa::SigningKey};

    let signing_key = match key_text(key) {
        Some(pem) if pem.contains("BEGIN EC PRIVATE KEY") => SecretKey::from_sec1_pem(pem)
            .map(SigningKey::from)
            .map_err(|e| JwtError::SigningFailure(format!("Invalid SEC1 P-256 key: {e}")))?,
        Some(pem) => SigningKey::from_pkcs8_pem(pem)
            .map_err(|e| JwtError::SigningFailure(format!("Invalid PKCS#8 P-256 key: {e}")))?,
        None => SigningKey::from_pkcs8_der(key)
            .map_err(|e| JwtError::SigningFailure(format!("Invalid P-256 key: {e}")))?,
    };

    let signature: Signature = signing_key
        .try_sign(message)
        .map_err(|e| JwtError::SigningFailure(format!("ES256 signing failed: {e}")))?;
    Ok(signature.to_der().as_bytes().to_vec())
}

/// Sign with ECDSA P-384 (ES384), returning the DER signature
pub(crate) fn sign_es384_der(message: &[u8], key: &[u8]) -> JwtResult<Vec<u8>> {
    use p384::pkcs8::DecodePrivateKey;
    use p384::{SecretKey, ecdsa::Signature, ecdsa::SigningKey};

    let signing_key = match key_text(key) {
        Some(pem) if pem.contains("BEGIN EC PRIVATE KEY") => SecretKey::from_sec1_pem(pem)
            .map(SigningKey::from)
            .map_err(|e| JwtError::SigningFailure(format!("Invalid SEC1 P-384 key: {e}")))?,
        Some(pem) => SigningKey::from_pkcs8_pem(pem)
            .map_err(|e| JwtError::SigningFailure(format!("Invalid PKCS#8 P-384 key: {e}")))?,
        None => SigningKey::from_pkcs8_der(key)
            .map_err(|e| JwtError::SigningFailure(format!("Invalid P-384 key: {e}")))?,
    };

    let signature: Signature = signing_key
        .try_sign(message)
        .map_err(|e| JwtError::SigningFailure(format!("ES384 signing failed: {e}")))?;
    Ok(signature.to_der().as_bytes().to_vec())
}
