//! Compact JWT encoding
//!
//! `header.payload.signature`, each segment base64url without padding. The
//! signature covers the ASCII bytes of `header.payload`.

use crate::algorithms;
use crate::error::{JwtError, JwtResult};
use crate::signer::sign_with;
use crate::types::{DecodedJwt, JwtHeader};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Serialize;
use serde_json::{Map, Value};

/// Base64 URL-safe encoding without padding (RFC 7515)
#[inline]
#[must_use]
pub fn base64url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Base64 URL-safe decoding without padding (RFC 7515)
///
/// # Errors
/// Returns `JwtError::InvalidToken` if `input` is not unpadded base64url.
#[inline]
pub fn base64url_decode(input: &str) -> JwtResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| JwtError::InvalidToken(format!("Invalid base64url segment: {e}")))
}

/// Encode and sign `payload` as a compact JWT.
///
/// The header is `{"typ":"JWT","alg":alg}` plus `kid` when given. Fields in
/// `extra_header` are merged underneath, so they never override `typ`, `alg`
/// or `kid`. JSON objects keep their field order, so equal inputs give equal
/// tokens for deterministic algorithms.
///
/// # Errors
/// - `JwtError::UnsupportedAlgorithm` if `alg` is not in the registry
/// - `JwtError::Serialization` if the payload cannot be serialized
/// - any signing error from [`crate::sign`]
pub fn encode<P>(
    payload: &P,
    key: &[u8],
    alg: &str,
    key_id: Option<&str>,
    extra_header: Option<&Map<String, Value>>,
) -> JwtResult<String>
where
    P: Serialize + ?Sized,
{
    let (algorithm, _) = algorithms::lookup(alg)?;
    let header = JwtHeader::compose(algorithm, key_id, extra_header);

    let header_b64 = base64url_encode(&serde_json::to_vec(&header)?);
    let payload_b64 = base64url_encode(&serde_json::to_vec(payload)?);

    let mut token = String::with_capacity(header_b64.len() + payload_b64.len() + 2);
    token.push_str(&header_b64);
    token.push('.');
    token.push_str(&payload_b64);

    let signature = sign_with(token.as_bytes(), key, algorithm)?;
    token.push('.');
    token.push_str(&base64url_encode(&signature));

    Ok(token)
}

/// Split a compact JWT and decode its header, payload and signature.
///
/// The signature is not checked.
///
/// # Errors
/// Returns `JwtError::InvalidToken` if the token does not have exactly three
/// segments or a segment is not valid base64url/JSON.
pub fn decode_segments(token: &str) -> JwtResult<DecodedJwt> {
    let parts: Vec<&str> = token.split('.').collect();
    let [header_b64, payload_b64, signature_b64] = parts.as_slice() else {
        return Err(JwtError::InvalidToken(format!(
            "expected 3 segments, found {}",
            parts.len()
        )));
    };

    let header: JwtHeader = serde_json::from_slice(&base64url_decode(header_b64)?)
        .map_err(|e| JwtError::InvalidToken(format!("Invalid header JSON: {e}")))?;
    let payload: Value = serde_json::from_slice(&base64url_decode(payload_b64)?)
        .map_err(|e| JwtError::InvalidToken(format!("Invalid payload JSON: {e}")))?;
    let signature = base64url_decode(signature_b64)?;

    Ok(DecodedJwt {
        header,
        payload,
        signature,
    })
}
