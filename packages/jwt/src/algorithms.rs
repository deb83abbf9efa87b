//! JWS algorithm registry
//!
//! Every supported `alg` identifier maps to a signing family and a digest.
//! The table is fixed at compile time; anything outside it is rejected with
//! `JwtError::UnsupportedAlgorithm`.

use crate::error::{JwtError, JwtResult};
use std::fmt;
use std::str::FromStr;

/// Supported JWS algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// ECDSA P-384 with SHA-384
    ES384,
    /// ECDSA P-256 with SHA-256
    ES256,
    /// HMAC with SHA-256
    HS256,
    /// HMAC with SHA-384
    HS384,
    /// HMAC with SHA-512
    HS512,
    /// RSASSA-PKCS1-v1_5 with SHA-256
    RS256,
    /// RSASSA-PKCS1-v1_5 with SHA-384
    RS384,
    /// RSASSA-PKCS1-v1_5 with SHA-512
    RS512,
    /// Ed25519
    EdDSA,
}

/// How a signature is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Keyed hash over the message with a shared secret
    Hmac,
    /// Private-key signature over a digest of the message (RSA, ECDSA)
    AsymmetricDigest,
    /// Detached Edwards-curve signature
    EdDsa,
}

/// Digest named by a registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestName {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
    /// Intrinsic to EdDSA
    EdDsa,
}

impl DigestName {
    /// Registry spelling of the digest
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DigestName::Sha256 => "SHA256",
            DigestName::Sha384 => "SHA384",
            DigestName::Sha512 => "SHA512",
            DigestName::EdDsa => "EdDSA",
        }
    }
}

/// Registry entry: signing family plus digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmDescriptor {
    /// Signing family
    pub family: Family,
    /// Digest used by the family
    pub digest: DigestName,
}

impl Algorithm {
    /// All registry entries
    pub const ALL: [Algorithm; 9] = [
        Algorithm::ES384,
        Algorithm::ES256,
        Algorithm::HS256,
        Algorithm::HS384,
        Algorithm::HS512,
        Algorithm::RS256,
        Algorithm::RS384,
        Algorithm::RS512,
        Algorithm::EdDSA,
    ];

    /// The `alg` header value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Algorithm::ES384 => "ES384",
            Algorithm::ES256 => "ES256",
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            Algorithm::RS256 => "RS256",
            Algorithm::RS384 => "RS384",
            Algorithm::RS512 => "RS512",
            Algorithm::EdDSA => "EdDSA",
        }
    }

    /// Family and digest for this algorithm
    #[must_use]
    pub const fn descriptor(self) -> AlgorithmDescriptor {
        let (family, digest) = match self {
            Algorithm::ES384 => (Family::AsymmetricDigest, DigestName::Sha384),
            Algorithm::ES256 => (Family::AsymmetricDigest, DigestName::Sha256),
            Algorithm::HS256 => (Family::Hmac, DigestName::Sha256),
            Algorithm::HS384 => (Family::Hmac, DigestName::Sha384),
            Algorithm::HS512 => (Family::Hmac, DigestName::Sha512),
            Algorithm::RS256 => (Family::AsymmetricDigest, DigestName::Sha256),
            Algorithm::RS384 => (Family::AsymmetricDigest, DigestName::Sha384),
            Algorithm::RS512 => (Family::AsymmetricDigest, DigestName::Sha512),
            Algorithm::EdDSA => (Family::EdDsa, DigestName::EdDsa),
        };
        AlgorithmDescriptor { family, digest }
    }

    /// Curve size for ECDSA algorithms, whose DER output must be re-encoded
    #[must_use]
    pub const fn ecdsa_key_bits(self) -> Option<usize> {
        match self {
            Algorithm::ES256 => Some(256),
            Algorithm::ES384 => Some(384),
            _ => None,
        }
    }

    /// Raw signature width in bytes.
    ///
    /// `None` for RSA, where the width equals the key's modulus size.
    #[must_use]
    pub const fn signature_len(self) -> Option<usize> {
        match self {
            Algorithm::HS256 => Some(32),
            Algorithm::HS384 => Some(48),
            Algorithm::HS512 | Algorithm::ES256 | Algorithm::EdDSA => Some(64),
            Algorithm::ES384 => Some(96),
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => None,
        }
    }
}

/// Look up an algorithm identifier in the registry.
///
/// # Errors
/// Returns `JwtError::UnsupportedAlgorithm` for identifiers outside the
/// table, including `"none"`.
pub fn lookup(alg: &str) -> JwtResult<(Algorithm, AlgorithmDescriptor)> {
    let algorithm: Algorithm = alg.parse()?;
    Ok((algorithm, algorithm.descriptor()))
}

impl FromStr for Algorithm {
    type Err = JwtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| JwtError::unsupported_algorithm(s))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
