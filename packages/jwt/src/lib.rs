//! JSON Web Token construction and signing
//!
//! This crate builds signed compact JWTs for outgoing assertions:
//! - HS256/384/512, RS256/384/512, ES256/384 and EdDSA
//! - ECDSA signatures re-encoded from DER to fixed-width `r || s`
//! - Deterministic header layout with caller-supplied extra fields
//!
//! Verification is not provided.

pub mod algorithms;
pub mod builder;
pub mod der;
pub mod encoder;
mod error;
pub mod signature_codec;
mod signer;
mod types;

pub use algorithms::{Algorithm, AlgorithmDescriptor, DigestName, Family, lookup};
pub use builder::JwtBuilder;
pub use encoder::{base64url_decode, base64url_encode, decode_segments, encode};
pub use error::*;
pub use signature_codec::signature_from_der;
pub use signer::{sign, sign_with};
pub use types::*;
