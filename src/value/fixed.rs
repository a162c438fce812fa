use crate::error::{CodecError, Result};
use crate::tag::AtomType;

use super::expect_len;

// 16.16 and 32.32 fixed point. The 32-bit flavors render with 4 fractional
// decimals; the 64-bit flavors render whole and fraction separately, the
// fraction as a truncated 9-digit decimal field.

const FRAC_DIGITS_64: u64 = 1_000_000_000;

fn raw32(tag: AtomType, data: &[u8]) -> Result<u32> {
    expect_len(tag, data, 4)?;
    Ok(u32::from_be_bytes(data.try_into().unwrap()))
}

fn raw64(tag: AtomType, data: &[u8]) -> Result<u64> {
    expect_len(tag, data, 8)?;
    Ok(u64::from_be_bytes(data.try_into().unwrap()))
}

pub(crate) fn decode(tag: AtomType, data: &[u8]) -> Result<f64> {
    match tag {
        AtomType::UF32 => Ok(f64::from(raw32(tag, data)?) / 65536.0),
        AtomType::SF32 => Ok(f64::from(raw32(tag, data)? as i32) / 65536.0),
        AtomType::UF64 => Ok(raw64(tag, data)? as f64 / 4294967296.0),
        AtomType::SF64 => Ok(raw64(tag, data)? as i64 as f64 / 4294967296.0),
        _ => Err(CodecError::no_conversion(tag, "float")),
    }
}

pub(crate) fn encode(tag: AtomType, value: f64) -> Result<Vec<u8>> {
    match tag {
        AtomType::UF32 => {
            let scaled = (value * 65536.0).round();
            if !(0.0..=f64::from(u32::MAX)).contains(&scaled) {
                return Err(CodecError::range(tag, value));
            }
            Ok((scaled as u32).to_be_bytes().to_vec())
        }
        AtomType::SF32 => {
            let scaled = (value * 65536.0).round();
            if !(f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&scaled) {
                return Err(CodecError::range(tag, value));
            }
            Ok((scaled as i32).to_be_bytes().to_vec())
        }
        AtomType::UF64 => {
            let scaled = (value * 4294967296.0).round();
            if !(0.0..18446744073709551616.0).contains(&scaled) {
                return Err(CodecError::range(tag, value));
            }
            Ok((scaled as u64).to_be_bytes().to_vec())
        }
        AtomType::SF64 => {
            let scaled = (value * 4294967296.0).round();
            if !(-9223372036854775808.0..9223372036854775808.0).contains(&scaled) {
                return Err(CodecError::range(tag, value));
            }
            Ok((scaled as i64).to_be_bytes().to_vec())
        }
        _ => Err(CodecError::no_conversion(tag, "float")),
    }
}

/// 9-digit truncated decimal rendering of the fractional 32 bits.
fn frac_digits(lo: u32) -> u64 {
    ((u128::from(lo) * u128::from(FRAC_DIGITS_64)) >> 32) as u64
}

/// Smallest fractional field reproducing `digits` under [`frac_digits`].
fn frac_raw(digits: u64) -> u64 {
    let scaled = (u128::from(digits) << 32) + u128::from(FRAC_DIGITS_64) - 1;
    (scaled / u128::from(FRAC_DIGITS_64)) as u64
}

pub(crate) fn render(tag: AtomType, data: &[u8]) -> Result<String> {
    match tag {
        AtomType::UF32 => Ok(format!("{:.4}", f64::from(raw32(tag, data)?) / 65536.0)),
        AtomType::SF32 => Ok(format!(
            "{:.4}",
            f64::from(raw32(tag, data)? as i32) / 65536.0
        )),
        AtomType::UF64 => {
            let raw = raw64(tag, data)?;
            Ok(format!(
                "{}.{:09}",
                raw >> 32,
                frac_digits(raw as u32)
            ))
        }
        AtomType::SF64 => {
            let raw = raw64(tag, data)? as i64;
            let magnitude = raw.unsigned_abs();
            let sign = if raw < 0 { "-" } else { "" };
            Ok(format!(
                "{sign}{}.{:09}",
                magnitude >> 32,
                frac_digits(magnitude as u32)
            ))
        }
        _ => Err(CodecError::no_conversion(tag, "string")),
    }
}

/// Parse `whole.fraction` into a 32.32 magnitude, digit-exact with respect
/// to [`render`].
fn parse_magnitude_64(tag: AtomType, text: &str) -> Result<u64> {
    let (whole_text, frac_text) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };
    if whole_text.is_empty() || !whole_text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::invalid(format!(
            "{tag}: not a fixed-point number: {text:?}"
        )));
    }
    if !frac_text.bytes().all(|b| b.is_ascii_digit()) || frac_text.len() > 9 {
        return Err(CodecError::invalid(format!(
            "{tag}: fraction must be at most 9 digits: {text:?}"
        )));
    }
    let whole: u64 = whole_text
        .parse()
        .map_err(|_| CodecError::range(tag, text))?;
    if whole > u64::from(u32::MAX) {
        return Err(CodecError::range(tag, text));
    }
    let mut digits: u64 = frac_text.parse().unwrap_or(0);
    // right-pad to the 9-digit field
    for _ in frac_text.len()..9 {
        digits *= 10;
    }
    Ok((whole << 32) | frac_raw(digits))
}

pub(crate) fn parse(tag: AtomType, text: &str) -> Result<Vec<u8>> {
    let text = text.trim();
    match tag {
        AtomType::UF32 | AtomType::SF32 => {
            let value: f64 = text
                .parse()
                .map_err(|_| CodecError::invalid(format!("{tag}: not a valid float: {text:?}")))?;
            encode(tag, value)
        }
        AtomType::UF64 => Ok(parse_magnitude_64(tag, text)?.to_be_bytes().to_vec()),
        AtomType::SF64 => {
            let (negative, magnitude_text) = match text.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, text),
            };
            let magnitude = parse_magnitude_64(tag, magnitude_text)?;
            let raw = if negative {
                if magnitude > 1u64 << 63 {
                    return Err(CodecError::range(tag, text));
                }
                magnitude.wrapping_neg() as i64
            } else {
                i64::try_from(magnitude).map_err(|_| CodecError::range(tag, text))?
            };
            Ok(raw.to_be_bytes().to_vec())
        }
        _ => Err(CodecError::no_conversion(tag, "string")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uf32_render() {
        assert_eq!(
            render(AtomType::UF32, &0x0001_8000u32.to_be_bytes()).unwrap(),
            "1.5000"
        );
        assert_eq!(render(AtomType::UF32, &[0; 4]).unwrap(), "0.0000");
    }

    #[test]
    fn sf32_negative() {
        let raw = (-98304i32).to_be_bytes();
        assert_eq!(render(AtomType::SF32, &raw).unwrap(), "-1.5000");
        assert_eq!(parse(AtomType::SF32, "-1.5000").unwrap(), raw.to_vec());
    }

    #[test]
    fn uf64_split_rendering() {
        let raw = 0x0000_0001_8000_0000u64.to_be_bytes();
        assert_eq!(render(AtomType::UF64, &raw).unwrap(), "1.500000000");
        assert_eq!(parse(AtomType::UF64, "1.500000000").unwrap(), raw.to_vec());
    }

    #[test]
    fn sf64_sign() {
        let raw = (-0x0000_0001_8000_0000i64).to_be_bytes();
        assert_eq!(render(AtomType::SF64, &raw).unwrap(), "-1.500000000");
        assert_eq!(parse(AtomType::SF64, "-1.500000000").unwrap(), raw.to_vec());
    }

    #[test]
    fn text_form_is_digit_exact() {
        // every 9-digit fraction survives text -> raw -> text
        for digits in [0u64, 1, 499_999_999, 500_000_000, 999_999_999] {
            let raw = frac_raw(digits);
            assert!(raw <= u64::from(u32::MAX));
            assert_eq!(frac_digits(raw as u32), digits);
        }
    }

    #[test]
    fn range_errors() {
        assert!(matches!(
            encode(AtomType::UF32, -0.5),
            Err(CodecError::Range { .. })
        ));
        assert!(matches!(
            encode(AtomType::UF32, 65536.0),
            Err(CodecError::Range { .. })
        ));
        assert!(matches!(
            parse(AtomType::UF64, "4294967296.0"),
            Err(CodecError::Range { .. })
        ));
    }
}
