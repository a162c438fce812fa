//! Per-type scalar codecs and the tag-keyed dispatch into them.
//!
//! Every conversion pair lives in one of the family modules; the functions
//! here are the closed dispatch tables. A (tag, host form) pair with no
//! table entry fails with [`CodecError::NoSuchConversion`].

pub(crate) mod cstr;
pub(crate) mod data;
pub(crate) mod escape;
pub(crate) mod fixed;
pub(crate) mod float;
pub(crate) mod fourchar;
pub(crate) mod fract;
pub(crate) mod ip;
pub(crate) mod sint;
pub(crate) mod uint;
pub(crate) mod ustr;
pub(crate) mod uuid;

use crate::error::{CodecError, Result};
use crate::tag::AtomType;
use crate::tag::AtomType::*;

pub(crate) fn expect_len(tag: AtomType, data: &[u8], len: usize) -> Result<()> {
    if data.len() != len {
        return Err(CodecError::invalid(format!(
            "{tag} payload must be {len} bytes, got {}",
            data.len()
        )));
    }
    Ok(())
}

/// Integer text parsing shared by every integer family: decimal, or hex
/// with a `0x` prefix.
pub(crate) fn parse_int<T: num_traits::Num>(tag: AtomType, text: &str) -> Result<T> {
    let text = text.trim();
    let (radix, digits) = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => (16, hex),
        None => (10, text),
    };
    T::from_str_radix(digits, radix)
        .map_err(|_| CodecError::invalid(format!("{tag}: not a valid integer: {text:?}")))
}

pub(crate) fn decode_uint(tag: AtomType, data: &[u8]) -> Result<u64> {
    match tag {
        UI01 | UI08 | UI16 | UI32 | UI64 => uint::decode(tag, data),
        _ => Err(CodecError::no_conversion(tag, "unsigned integer")),
    }
}

pub(crate) fn decode_int(tag: AtomType, data: &[u8]) -> Result<i64> {
    match tag {
        SI08 | SI16 | SI32 | SI64 | ENUM => sint::decode(tag, data),
        _ => Err(CodecError::no_conversion(tag, "signed integer")),
    }
}

pub(crate) fn decode_float(tag: AtomType, data: &[u8]) -> Result<f64> {
    match tag {
        FP32 | FP64 => float::decode(tag, data),
        UF32 | UF64 | SF32 | SF64 => fixed::decode(tag, data),
        _ => Err(CodecError::no_conversion(tag, "float")),
    }
}

pub(crate) fn decode_bool(tag: AtomType, data: &[u8]) -> Result<bool> {
    uint::decode_bool(tag, data)
}

pub(crate) fn decode_uint_pair(tag: AtomType, data: &[u8]) -> Result<[u64; 2]> {
    fract::decode_unsigned(tag, data)
}

pub(crate) fn decode_int_pair(tag: AtomType, data: &[u8]) -> Result<[i64; 2]> {
    fract::decode_signed(tag, data)
}

pub(crate) fn decode_bytes<'a>(tag: AtomType, data: &'a [u8]) -> Result<&'a [u8]> {
    match tag {
        DATA | CNCT => Ok(data),
        _ => Err(CodecError::no_conversion(tag, "bytes")),
    }
}

/// Rendering used inside structured contexts (no delimiters).
pub(crate) fn string_raw(tag: AtomType, data: &[u8]) -> Result<String> {
    match tag {
        UI01 | UI08 | UI16 | UI32 | UI64 => uint::render(tag, data),
        SI08 | SI16 | SI32 | SI64 | ENUM => sint::render(tag, data),
        FP32 | FP64 => float::render(tag, data),
        UF32 | UF64 | SF32 | SF64 => fixed::render(tag, data),
        UR32 | UR64 | SR32 | SR64 => fract::render(tag, data),
        FC32 => fourchar::render_raw(tag, data),
        IP32 => ip::render_ip32(data),
        IPAD => ip::render_ipad_raw(data),
        CSTR => cstr::render_raw(data),
        USTR => ustr::render_raw(data),
        DATA | CNCT => data::render(data),
        UUID => uuid::render(tag, data),
        NULL | CONT => Ok(String::new()),
    }
}

/// Rendering used as a standalone value, quotes and brackets included.
/// This is the form the canonical text format puts at leaves.
pub(crate) fn string_delimited(tag: AtomType, data: &[u8]) -> Result<String> {
    match tag {
        FC32 => fourchar::render_delimited(tag, data),
        IPAD => ip::render_ipad_delimited(data),
        CSTR => cstr::render_delimited(data),
        USTR => ustr::render_delimited(data),
        _ => string_raw(tag, data),
    }
}

pub(crate) fn encode_uint(tag: AtomType, value: u64) -> Result<Vec<u8>> {
    match tag {
        UI01 | UI08 | UI16 | UI32 | UI64 => uint::encode(tag, value),
        _ => Err(CodecError::no_conversion(tag, "unsigned integer")),
    }
}

pub(crate) fn encode_int(tag: AtomType, value: i64) -> Result<Vec<u8>> {
    match tag {
        SI08 | SI16 | SI32 | SI64 | ENUM => sint::encode(tag, value),
        _ => Err(CodecError::no_conversion(tag, "signed integer")),
    }
}

pub(crate) fn encode_float(tag: AtomType, value: f64) -> Result<Vec<u8>> {
    match tag {
        FP32 | FP64 => float::encode(tag, value),
        UF32 | UF64 | SF32 | SF64 => fixed::encode(tag, value),
        _ => Err(CodecError::no_conversion(tag, "float")),
    }
}

pub(crate) fn encode_bool(tag: AtomType, value: bool) -> Result<Vec<u8>> {
    uint::encode_bool(tag, value)
}

pub(crate) fn encode_uint_pair(tag: AtomType, num: u64, den: u64) -> Result<Vec<u8>> {
    match tag {
        UR32 | UR64 => fract::encode_unsigned(tag, num, den),
        _ => Err(CodecError::no_conversion(tag, "unsigned pair")),
    }
}

pub(crate) fn encode_int_pair(tag: AtomType, num: i64, den: i64) -> Result<Vec<u8>> {
    match tag {
        SR32 | SR64 => fract::encode_signed(tag, num, den),
        _ => Err(CodecError::no_conversion(tag, "signed pair")),
    }
}

pub(crate) fn encode_bytes(tag: AtomType, raw: &[u8]) -> Result<Vec<u8>> {
    match tag {
        DATA | CNCT => Ok(raw.to_vec()),
        _ => Err(CodecError::no_conversion(tag, "bytes")),
    }
}

/// Inverse of [`string_raw`].
pub(crate) fn encode_string(tag: AtomType, text: &str) -> Result<Vec<u8>> {
    match tag {
        UI01 | UI08 | UI16 | UI32 | UI64 => uint::parse(tag, text),
        SI08 | SI16 | SI32 | SI64 | ENUM => sint::parse(tag, text),
        FP32 | FP64 => float::parse(tag, text),
        UF32 | UF64 | SF32 | SF64 => fixed::parse(tag, text),
        UR32 | UR64 | SR32 | SR64 => fract::parse(tag, text),
        FC32 => fourchar::parse(tag, text),
        IP32 => ip::parse_ip32(tag, text),
        IPAD => ip::parse_ipad_raw(text),
        CSTR => cstr::parse_raw(text),
        USTR => ustr::parse_raw(text),
        DATA | CNCT => data::parse(text),
        UUID => uuid::parse(tag, text),
        NULL | CONT => Err(CodecError::no_conversion(tag, "string")),
    }
}

/// Inverse of [`string_delimited`].
pub(crate) fn encode_string_delimited(tag: AtomType, text: &str) -> Result<Vec<u8>> {
    match tag {
        FC32 => fourchar::parse(tag, text),
        IPAD => ip::parse_ipad_delimited(text),
        CSTR => cstr::parse_delimited(text),
        USTR => ustr::parse_delimited(text),
        _ => encode_string(tag, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_conversion_table() {
        assert!(matches!(
            decode_uint(SI32, &[0; 4]),
            Err(CodecError::NoSuchConversion { .. })
        ));
        assert!(matches!(
            decode_int(UI32, &[0; 4]),
            Err(CodecError::NoSuchConversion { .. })
        ));
        assert!(matches!(
            decode_float(CSTR, &[0]),
            Err(CodecError::NoSuchConversion { .. })
        ));
        assert!(matches!(
            decode_bool(UI08, &[1]),
            Err(CodecError::NoSuchConversion { .. })
        ));
        assert!(matches!(
            encode_bytes(UI32, &[1, 2, 3, 4]),
            Err(CodecError::NoSuchConversion { .. })
        ));
    }

    #[test]
    fn containers_render_empty() {
        assert_eq!(string_raw(CONT, &[]).unwrap(), "");
        assert_eq!(string_delimited(NULL, &[]).unwrap(), "");
        assert!(matches!(
            encode_string(CONT, "x"),
            Err(CodecError::NoSuchConversion { .. })
        ));
    }

    #[test]
    fn delimited_and_raw_differ_for_strings() {
        let payload = b"hi\0";
        assert_eq!(string_raw(CSTR, payload).unwrap(), "hi");
        assert_eq!(string_delimited(CSTR, payload).unwrap(), "\"hi\"");
        assert_eq!(string_raw(FC32, b"ABCD").unwrap(), "ABCD");
        assert_eq!(string_delimited(FC32, b"ABCD").unwrap(), "'ABCD'");
    }
}
