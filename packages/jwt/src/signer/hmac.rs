//! HMAC-based signing (HS256, HS384, HS512)

use crate::algorithms::DigestName;
use crate::error::{JwtError, JwtResult};
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

/// Keyed digest of `message` under `secret`, returned as raw bytes
pub(crate) fn sign(digest: DigestName, message: &[u8], secret: &[u8]) -> JwtResult<Vec<u8>> {
    match digest {
        DigestName::Sha256 => mac::<HmacSha256>(message, secret),
        DigestName::Sha384 => mac::<HmacSha384>(message, secret),
        DigestName::Sha512 => mac::<HmacSha512>(message, secret),
        DigestName::EdDsa => Err(JwtError::unsupported_algorithm("HMAC with EdDSA digest")),
    }
}

#[inline]
fn mac<M: Mac + hmac::digest::KeyInit>(message: &[u8], secret: &[u8]) -> JwtResult<Vec<u8>> {
    let mut mac = <M as Mac>::new_from_slice(secret)
        .map_err(|_| JwtError::signing_failure("Invalid HMAC key"))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // RFC 4231 test case 1
    const KEY: [u8; 20] = [0x0b; 20];
    const DATA: &[u8] = b"Hi There";

    #[test]
    fn test_rfc4231_vectors() {
        assert_eq!(
            sign(DigestName::Sha256, DATA, &KEY).unwrap(),
            hex!("b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7")
        );
        assert_eq!(
            sign(DigestName::Sha384, DATA, &KEY).unwrap(),
            hex!(
                "afd03944d84895626b0825f4ab46907f15f9dadbe4101ec6"
                "82aa034c7cebc59cfaea9ea9076ede7f4af152e8b2fa9cb6"
            )
        );
        assert_eq!(
            sign(DigestName::Sha512, DATA, &KEY).unwrap(),
            hex!(
                "87aa7cdea5ef619d4ff0b4241a1d6cb02379f4e2ce4ec2787ad0b30545e17cde"
                "daa833b7d6b8a702038b274eaea3f4e4be9d914eeb61f1702e696c203a126854"
            )
        );
    }

    #[test]
    fn test_empty_secret_is_accepted() {
        assert_eq!(sign(DigestName::Sha256, DATA, b"").unwrap().len(), 32);
    }
}
