//! ECDSA signature conversion from DER to the fixed-width JWS form
//!
//! ECDSA primitives emit `SEQUENCE { INTEGER r, INTEGER s }`. JWS wants
//! `r || s` with each half left-padded to the curve's byte width.

use crate::der::{self, TAG_INTEGER, TAG_SEQUENCE};
use crate::error::{JwtError, JwtResult};

/// Convert a DER-encoded ECDSA signature into raw `r || s`.
///
/// The output is always `key_size_bits / 4` bytes long.
///
/// # Errors
/// Returns `JwtError::MalformedDer` if the buffer is not exactly a SEQUENCE
/// of two INTEGERs, or if either integer does not fit in `key_size_bits / 8`
/// bytes.
pub fn signature_from_der(der_bytes: &[u8], key_size_bits: usize) -> JwtResult<Vec<u8>> {
    if key_size_bits == 0 || key_size_bits % 8 != 0 {
        return Err(JwtError::malformed_der(&format!(
            "key size of {key_size_bits} bits is not a whole number of bytes"
        )));
    }
    let width = key_size_bits / 8;

    let sequence = der::decode(der_bytes, 0)?;
    if !sequence.constructed || sequence.tag != TAG_SEQUENCE {
        return Err(JwtError::malformed_der("signature is not a SEQUENCE"));
    }
    let (r, offset) = read_integer(der_bytes, sequence.next_offset, "r")?;
    let (s, end) = read_integer(der_bytes, offset, "s")?;

    let declared_end = sequence.next_offset.checked_add(sequence.length);
    if declared_end != Some(end) || end != der_bytes.len() {
        return Err(JwtError::malformed_der(&format!(
            "SEQUENCE declares {} content bytes but r and s span {}",
            sequence.length,
            end - sequence.next_offset
        )));
    }

    let mut raw = Vec::with_capacity(width * 2);
    push_padded(&mut raw, r, width, "r")?;
    push_padded(&mut raw, s, width, "s")?;
    Ok(raw)
}

fn read_integer<'a>(der_bytes: &'a [u8], offset: usize, name: &str) -> JwtResult<(&'a [u8], usize)> {
    let element = der::decode(der_bytes, offset)?;
    match element.value {
        Some(value) if element.tag == TAG_INTEGER => Ok((value, element.next_offset)),
        _ => Err(JwtError::malformed_der(&format!(
            "expected INTEGER for {name}, found tag {:#04x}",
            element.tag
        ))),
    }
}

// Strips two's-complement sign padding, then left-pads to `width`.
fn push_padded(out: &mut Vec<u8>, value: &[u8], width: usize, name: &str) -> JwtResult<()> {
    let first_nonzero = value.iter().position(|&b| b != 0).unwrap_or(value.len());
    let magnitude = &value[first_nonzero..];
    if magnitude.len() > width {
        return Err(JwtError::malformed_der(&format!(
            "{name} is {} bytes, wider than {width}",
            magnitude.len()
        )));
    }
    out.resize(out.len() + width - magnitude.len(), 0);
    out.extend_from_slice(magnitude);
    Ok(())
}
