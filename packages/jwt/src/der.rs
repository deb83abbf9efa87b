//! Minimal DER reader for ECDSA signatures
//!
//! Reads a single tag-length-value element at a time. It understands just
//! enough ASN.1 to walk `SEQUENCE { INTEGER r, INTEGER s }`: a constructed
//! element yields no value and only its header is consumed, so the next read
//! lands on its first child.

use crate::error::{JwtError, JwtResult};

/// Universal tag for INTEGER
pub const TAG_INTEGER: u8 = 0x02;
/// Universal tag for BIT STRING
pub const TAG_BIT_STRING: u8 = 0x03;
/// Universal tag for SEQUENCE
pub const TAG_SEQUENCE: u8 = 0x10;

/// One decoded DER element, borrowed from the input buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerElement<'a> {
    /// Tag number (low five bits of the identifier octet)
    pub tag: u8,
    /// Constructed flag (bit 6 of the identifier octet)
    pub constructed: bool,
    /// Declared content length
    pub length: usize,
    /// Content octets; `None` for constructed elements
    pub value: Option<&'a [u8]>,
    /// Offset of the next element to read
    pub next_offset: usize,
}

/// Decode the element starting at `offset`.
///
/// BIT STRING contents drop their leading unused-bits octet. Primitive
/// elements return their content octets. Constructed elements return no
/// value and `next_offset` points at their first child.
///
/// # Errors
/// Returns `JwtError::MalformedDer` if the buffer ends before the declared
/// length, the length uses the indefinite form, or a BIT STRING is empty.
pub fn decode(der: &[u8], offset: usize) -> JwtResult<DerElement<'_>> {
    let mut pos = offset;

    let identifier = *der
        .get(pos)
        .ok_or_else(|| JwtError::malformed_der("missing identifier octet"))?;
    pos += 1;
    let constructed = (identifier >> 5) & 0x01 == 1;
    let tag = identifier & 0x1f;

    let first = *der
        .get(pos)
        .ok_or_else(|| JwtError::malformed_der("missing length octet"))?;
    pos += 1;

    let length = if first & 0x80 != 0 {
        let count = usize::from(first & 0x7f);
        if count == 0 || count > std::mem::size_of::<usize>() {
            return Err(JwtError::malformed_der(&format!(
                "unsupported long-form length of {count} octets"
            )));
        }
        let octets = der
            .get(pos..pos + count)
            .ok_or_else(|| JwtError::malformed_der("truncated long-form length"))?;
        pos += count;
        octets
            .iter()
            .fold(0usize, |acc, &octet| (acc << 8) | usize::from(octet))
    } else {
        usize::from(first)
    };

    let (value, next_offset) = if tag == TAG_BIT_STRING {
        let content_len = length
            .checked_sub(1)
            .ok_or_else(|| JwtError::malformed_der("BIT STRING without unused-bits octet"))?;
        let start = pos + 1;
        let value = take(der, start, content_len)?;
        (Some(value), start + content_len)
    } else if !constructed {
        let value = take(der, pos, length)?;
        (Some(value), pos + length)
    } else {
        (None, pos)
    };

    Ok(DerElement {
        tag,
        constructed,
        length,
        value,
        next_offset,
    })
}

fn take(der: &[u8], start: usize, len: usize) -> JwtResult<&[u8]> {
    start
        .checked_add(len)
        .and_then(|end| der.get(start..end))
        .ok_or_else(|| {
            JwtError::malformed_der(&format!(
                "element of {len} bytes at offset {start} exceeds buffer of {} bytes",
                der.len()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_primitive_short_form() {
        let der = hex!("02 03 01 02 03 ff");
        let element = decode(&der, 0).unwrap();
        assert_eq!(element.tag, TAG_INTEGER);
        assert!(!element.constructed);
        assert_eq!(element.length, 3);
        assert_eq!(element.value, Some(&der[2..5]));
        assert_eq!(element.next_offset, 5);
    }

    #[test]
    fn test_constructed_consumes_header_only() {
        let der = hex!("30 06 02 01 05 02 01 07");
        let sequence = decode(&der, 0).unwrap();
        assert_eq!(sequence.tag, TAG_SEQUENCE);
        assert!(sequence.constructed);
        assert_eq!(sequence.length, 6);
        assert_eq!(sequence.value, None);
        assert_eq!(sequence.next_offset, 2);

        let r = decode(&der, sequence.next_offset).unwrap();
        assert_eq!(r.value, Some(&[0x05][..]));
        let s = decode(&der, r.next_offset).unwrap();
        assert_eq!(s.value, Some(&[0x07][..]));
        assert_eq!(s.next_offset, der.len());
    }

    #[test]
    fn test_long_form_length() {
        let mut der = vec![0x02, 0x81, 0x81];
        der.extend(std::iter::repeat_n(0xab, 0x81));
        let element = decode(&der, 0).unwrap();
        assert_eq!(element.length, 0x81);
        assert_eq!(element.value.map(<[u8]>::len), Some(0x81));
        assert_eq!(element.next_offset, 3 + 0x81);
    }

    #[test]
    fn test_bit_string_skips_unused_bits_octet() {
        let der = hex!("03 04 00 aa bb cc");
        let element = decode(&der, 0).unwrap();
        assert_eq!(element.tag, TAG_BIT_STRING);
        assert_eq!(element.value, Some(&hex!("aa bb cc")[..]));
        assert_eq!(element.next_offset, 6);
    }

    #[test]
    fn test_decode_at_offset() {
        let der = hex!("ff ff 02 01 2a");
        let element = decode(&der, 2).unwrap();
        assert_eq!(element.value, Some(&[0x2a][..]));
        assert_eq!(element.next_offset, 5);
    }

    #[test]
    fn test_truncated_inputs_fail() {
        assert!(matches!(decode(&[], 0), Err(JwtError::MalformedDer(_))));
        assert!(matches!(decode(&[0x02], 0), Err(JwtError::MalformedDer(_))));
        assert!(matches!(
            decode(&hex!("02 05 01 02"), 0),
            Err(JwtError::MalformedDer(_))
        ));
        assert!(matches!(
            decode(&hex!("02 82 01"), 0),
            Err(JwtError::MalformedDer(_))
        ));
    }

    #[test]
    fn test_indefinite_length_rejected() {
        assert!(matches!(
            decode(&hex!("30 80 02 01 01 00 00"), 0),
            Err(JwtError::MalformedDer(_))
        ));
    }

    #[test]
    fn test_empty_bit_string_rejected() {
        assert!(matches!(
            decode(&hex!("03 00"), 0),
            Err(JwtError::MalformedDer(_))
        ));
    }
}
