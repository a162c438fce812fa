use crate::error::{CodecError, Result};
use crate::tag::AtomType;

use super::{expect_len, parse_int};

fn be_signed(tag: AtomType, data: &[u8], width: usize) -> Result<i64> {
    expect_len(tag, data, width)?;
    let unsigned = data.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
    // sign-extend from the type width
    let shift = 64 - width as u32 * 8;
    Ok(((unsigned << shift) as i64) >> shift)
}

fn width_of(tag: AtomType) -> Option<usize> {
    match tag {
        AtomType::SI08 => Some(1),
        AtomType::SI16 => Some(2),
        AtomType::SI32 | AtomType::ENUM => Some(4),
        AtomType::SI64 => Some(8),
        _ => None,
    }
}

pub(crate) fn decode(tag: AtomType, data: &[u8]) -> Result<i64> {
    let width = width_of(tag).ok_or(CodecError::no_conversion(tag, "signed integer"))?;
    be_signed(tag, data, width)
}

pub(crate) fn encode(tag: AtomType, value: i64) -> Result<Vec<u8>> {
    let width = width_of(tag).ok_or(CodecError::no_conversion(tag, "signed integer"))?;
    if width < 8 {
        let bits = width as u32 * 8;
        let min = -(1i64 << (bits - 1));
        let max = (1i64 << (bits - 1)) - 1;
        if value < min || value > max {
            return Err(CodecError::range(tag, value));
        }
    }
    Ok(value.to_be_bytes()[8 - width..].to_vec())
}

pub(crate) fn render(tag: AtomType, data: &[u8]) -> Result<String> {
    decode(tag, data).map(|v| v.to_string())
}

pub(crate) fn parse(tag: AtomType, text: &str) -> Result<Vec<u8>> {
    encode(tag, parse_int::<i64>(tag, text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_extension() {
        assert_eq!(decode(AtomType::SI08, &[0xFF]).unwrap(), -1);
        assert_eq!(decode(AtomType::SI16, &[0x80, 0x00]).unwrap(), -32768);
        assert_eq!(decode(AtomType::SI32, &[0x7F, 0xFF, 0xFF, 0xFF]).unwrap(), 2147483647);
        assert_eq!(decode(AtomType::ENUM, &[0xFF, 0xFF, 0xFF, 0xFB]).unwrap(), -5);
    }

    #[test]
    fn range_checks() {
        assert!(matches!(
            encode(AtomType::SI08, 128),
            Err(CodecError::Range { .. })
        ));
        assert!(matches!(
            encode(AtomType::SI16, -32769),
            Err(CodecError::Range { .. })
        ));
        assert_eq!(encode(AtomType::SI08, -128).unwrap(), vec![0x80]);
    }

    #[test]
    fn text_round_trip() {
        let raw = parse(AtomType::SI32, "-2").unwrap();
        assert_eq!(raw, vec![0xFF, 0xFF, 0xFF, 0xFE]);
        assert_eq!(render(AtomType::SI32, &raw).unwrap(), "-2");
    }
}
