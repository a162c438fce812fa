use crate::error::{CodecError, Result};
use crate::tag::AtomType;

use super::{expect_len, parse_int};

// Rational pairs: numerator then denominator, two equal-width big-endian
// integers. Decoding is faithful to the stored bytes; encoding normalizes
// the sign onto the numerator and rejects a zero denominator.

pub(crate) fn decode_unsigned(tag: AtomType, data: &[u8]) -> Result<[u64; 2]> {
    match tag {
        AtomType::UR32 => {
            expect_len(tag, data, 4)?;
            Ok([
                u64::from(u16::from_be_bytes(data[..2].try_into().unwrap())),
                u64::from(u16::from_be_bytes(data[2..].try_into().unwrap())),
            ])
        }
        AtomType::UR64 => {
            expect_len(tag, data, 8)?;
            Ok([
                u64::from(u32::from_be_bytes(data[..4].try_into().unwrap())),
                u64::from(u32::from_be_bytes(data[4..].try_into().unwrap())),
            ])
        }
        _ => Err(CodecError::no_conversion(tag, "unsigned pair")),
    }
}

pub(crate) fn decode_signed(tag: AtomType, data: &[u8]) -> Result<[i64; 2]> {
    match tag {
        AtomType::SR32 => {
            expect_len(tag, data, 4)?;
            Ok([
                i64::from(i16::from_be_bytes(data[..2].try_into().unwrap())),
                i64::from(i16::from_be_bytes(data[2..].try_into().unwrap())),
            ])
        }
        AtomType::SR64 => {
            expect_len(tag, data, 8)?;
            Ok([
                i64::from(i32::from_be_bytes(data[..4].try_into().unwrap())),
                i64::from(i32::from_be_bytes(data[4..].try_into().unwrap())),
            ])
        }
        _ => Err(CodecError::no_conversion(tag, "signed pair")),
    }
}

pub(crate) fn encode_unsigned(tag: AtomType, num: u64, den: u64) -> Result<Vec<u8>> {
    if den == 0 {
        return Err(CodecError::ZeroDenominator);
    }
    match tag {
        AtomType::UR32 => {
            let num = u16::try_from(num).map_err(|_| CodecError::range(tag, num))?;
            let den = u16::try_from(den).map_err(|_| CodecError::range(tag, den))?;
            let mut out = num.to_be_bytes().to_vec();
            out.extend_from_slice(&den.to_be_bytes());
            Ok(out)
        }
        AtomType::UR64 => {
            let num = u32::try_from(num).map_err(|_| CodecError::range(tag, num))?;
            let den = u32::try_from(den).map_err(|_| CodecError::range(tag, den))?;
            let mut out = num.to_be_bytes().to_vec();
            out.extend_from_slice(&den.to_be_bytes());
            Ok(out)
        }
        _ => Err(CodecError::no_conversion(tag, "unsigned pair")),
    }
}

pub(crate) fn encode_signed(tag: AtomType, num: i64, den: i64) -> Result<Vec<u8>> {
    if den == 0 {
        return Err(CodecError::ZeroDenominator);
    }
    // sign lives on the numerator
    let (num, den) = if den < 0 {
        (
            num.checked_neg().ok_or(CodecError::range(tag, num))?,
            den.checked_neg().ok_or(CodecError::range(tag, den))?,
        )
    } else {
        (num, den)
    };
    match tag {
        AtomType::SR32 => {
            let num = i16::try_from(num).map_err(|_| CodecError::range(tag, num))?;
            let den = i16::try_from(den).map_err(|_| CodecError::range(tag, den))?;
            let mut out = num.to_be_bytes().to_vec();
            out.extend_from_slice(&den.to_be_bytes());
            Ok(out)
        }
        AtomType::SR64 => {
            let num = i32::try_from(num).map_err(|_| CodecError::range(tag, num))?;
            let den = i32::try_from(den).map_err(|_| CodecError::range(tag, den))?;
            let mut out = num.to_be_bytes().to_vec();
            out.extend_from_slice(&den.to_be_bytes());
            Ok(out)
        }
        _ => Err(CodecError::no_conversion(tag, "signed pair")),
    }
}

pub(crate) fn is_unsigned(tag: AtomType) -> bool {
    matches!(tag, AtomType::UR32 | AtomType::UR64)
}

pub(crate) fn render(tag: AtomType, data: &[u8]) -> Result<String> {
    if is_unsigned(tag) {
        let [num, den] = decode_unsigned(tag, data)?;
        Ok(format!("{num}/{den}"))
    } else {
        let [num, den] = decode_signed(tag, data)?;
        Ok(format!("{num}/{den}"))
    }
}

pub(crate) fn parse(tag: AtomType, text: &str) -> Result<Vec<u8>> {
    let (num_text, den_text) = text
        .split_once('/')
        .ok_or_else(|| CodecError::invalid(format!("{tag}: not a rational: {text:?}")))?;
    let (num_text, den_text) = (num_text.trim(), den_text.trim());
    if is_unsigned(tag) {
        encode_unsigned(
            tag,
            parse_int::<u64>(tag, num_text)?,
            parse_int::<u64>(tag, den_text)?,
        )
    } else {
        encode_signed(
            tag,
            parse_int::<i64>(tag, num_text)?,
            parse_int::<i64>(tag, den_text)?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sr32_decode_is_faithful() {
        let [num, den] = decode_signed(AtomType::SR32, &[0x00, 0x01, 0xFF, 0xFF]).unwrap();
        assert_eq!((num, den), (1, -1));
        assert_eq!(
            render(AtomType::SR32, &[0x00, 0x01, 0xFF, 0xFF]).unwrap(),
            "1/-1"
        );
    }

    #[test]
    fn zero_denominator_rejected() {
        assert!(matches!(
            parse(AtomType::UR32, "0/0"),
            Err(CodecError::ZeroDenominator)
        ));
        assert!(matches!(
            encode_signed(AtomType::SR64, 1, 0),
            Err(CodecError::ZeroDenominator)
        ));
    }

    #[test]
    fn encode_normalizes_sign_to_numerator() {
        assert_eq!(
            parse(AtomType::SR32, "1/-2").unwrap(),
            vec![0xFF, 0xFF, 0x00, 0x02]
        );
        assert_eq!(
            parse(AtomType::SR32, "-1/2").unwrap(),
            vec![0xFF, 0xFF, 0x00, 0x02]
        );
    }

    #[test]
    fn unsigned_ranges() {
        assert!(matches!(
            parse(AtomType::UR32, "65536/1"),
            Err(CodecError::Range { .. })
        ));
        assert_eq!(
            parse(AtomType::UR64, "1/2").unwrap(),
            vec![0, 0, 0, 1, 0, 0, 0, 2]
        );
    }
}
