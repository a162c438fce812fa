use crate::error::{CodecError, Result};
use crate::tag::AtomType;

use super::{expect_len, parse_int};

fn be_bytes(tag: AtomType, data: &[u8], width: usize) -> Result<u64> {
    expect_len(tag, data, width)?;
    Ok(data.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
}

pub(crate) fn decode(tag: AtomType, data: &[u8]) -> Result<u64> {
    match tag {
        AtomType::UI01 => {
            let raw = be_bytes(tag, data, 4)?;
            if raw > 1 {
                return Err(CodecError::range(tag, raw));
            }
            Ok(raw)
        }
        AtomType::UI08 => be_bytes(tag, data, 1),
        AtomType::UI16 => be_bytes(tag, data, 2),
        AtomType::UI32 => be_bytes(tag, data, 4),
        AtomType::UI64 => be_bytes(tag, data, 8),
        _ => Err(CodecError::no_conversion(tag, "unsigned integer")),
    }
}

pub(crate) fn decode_bool(tag: AtomType, data: &[u8]) -> Result<bool> {
    match tag {
        AtomType::UI01 => Ok(decode(tag, data)? == 1),
        _ => Err(CodecError::no_conversion(tag, "boolean")),
    }
}

fn encode_width(tag: AtomType, value: u64, width: usize) -> Result<Vec<u8>> {
    if width < 8 && value >= 1u64 << (width * 8) {
        return Err(CodecError::range(tag, value));
    }
    Ok(value.to_be_bytes()[8 - width..].to_vec())
}

pub(crate) fn encode(tag: AtomType, value: u64) -> Result<Vec<u8>> {
    match tag {
        AtomType::UI01 => {
            if value > 1 {
                return Err(CodecError::range(tag, value));
            }
            Ok((value as u32).to_be_bytes().to_vec())
        }
        AtomType::UI08 => encode_width(tag, value, 1),
        AtomType::UI16 => encode_width(tag, value, 2),
        AtomType::UI32 => encode_width(tag, value, 4),
        AtomType::UI64 => encode_width(tag, value, 8),
        _ => Err(CodecError::no_conversion(tag, "unsigned integer")),
    }
}

pub(crate) fn encode_bool(tag: AtomType, value: bool) -> Result<Vec<u8>> {
    match tag {
        AtomType::UI01 => encode(tag, u64::from(value)),
        _ => Err(CodecError::no_conversion(tag, "boolean")),
    }
}

pub(crate) fn render(tag: AtomType, data: &[u8]) -> Result<String> {
    decode(tag, data).map(|v| v.to_string())
}

pub(crate) fn parse(tag: AtomType, text: &str) -> Result<Vec<u8>> {
    encode(tag, parse_int::<u64>(tag, text)?)
}
