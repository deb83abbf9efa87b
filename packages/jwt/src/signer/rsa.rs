//! RSA-based signing (RS256, RS384, RS512)
//!
//! RSASSA-PKCS1-v1_5. Keys are accepted as PKCS#8 PEM (service-account
//! JSON ships these), PKCS#1 PEM, or PKCS#8 DER.

use super::key_text;
use crate::algorithms::DigestName;
use crate::error::{JwtError, JwtResult};
use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::sha2::{Sha256, Sha384, Sha512};
use rsa::signature::{SignatureEncoding, Signer};

/// Sign `message` with an RSA private key using the given digest
pub(crate) fn sign(digest: DigestName, message: &[u8], key: &[u8]) -> JwtResult<Vec<u8>> {
    let private_key = parse_private_key(key)?;
    match digest {
        DigestName::Sha256 => sign_with(SigningKey::<Sha256>::new(private_key), message),
        DigestName::Sha384 => sign_with(SigningKey::<Sha384>::new(private_key), message),
        DigestName::Sha512 => sign_with(SigningKey::<Sha512>::new(private_key), message),
        DigestName::EdDsa => Err(JwtError::unsupported_algorithm("RSA with EdDSA digest")),
    }
}

#[inline]
fn sign_with<S>(signing_key: S, message: &[u8]) -> JwtResult<Vec<u8>>
where
    S: Signer<rsa::pkcs1v15::Signature>,
{
    let signature = signing_key
        .try_sign(message)
        .map_err(|e| JwtError::SigningFailure(format!("RSA signing failed: {e}")))?;
    Ok(signature.to_vec())
}

fn parse_private_key(key: &[u8]) -> JwtResult<RsaPrivateKey> {
    match key_text(key) {
        Some(pem) if pem.contains("BEGIN RSA PRIVATE KEY") => RsaPrivateKey::from_pkcs1_pem(pem)
            .map_err(|e| JwtError::SigningFailure(format!("Invalid PKCS#1 RSA private key: {e}"))),
        Some(pem) => RsaPrivateKey::from_pkcs8_pem(pem)
            .map_err(|e| JwtError::SigningFailure(format!("Invalid PKCS#8 RSA private key: {e}"))),
        None => RsaPrivateKey::from_pkcs8_der(key)
            .map_err(|e| JwtError::SigningFailure(format!("Invalid RSA private key: {e}"))),
    }
}
