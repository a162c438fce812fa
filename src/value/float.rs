use crate::error::{CodecError, Result};
use crate::tag::AtomType;

use super::expect_len;

/// Exponent rendering: `D.DD…E±XX`, uppercase `E`, explicit exponent sign,
/// at least two exponent digits. 8 fractional digits for binary32, 17 for
/// binary64.
pub(crate) fn format_exponent(value: f64, digits: usize) -> String {
    let plain = format!("{value:.digits$e}");
    let Some((mantissa, exp)) = plain.split_once('e') else {
        // inf / NaN carry no exponent
        return plain;
    };
    match exp.strip_prefix('-') {
        Some(abs) => format!("{mantissa}E-{abs:0>2}"),
        None => format!("{mantissa}E+{exp:0>2}"),
    }
}

pub(crate) fn decode(tag: AtomType, data: &[u8]) -> Result<f64> {
    match tag {
        AtomType::FP32 => {
            expect_len(tag, data, 4)?;
            Ok(f32::from_be_bytes(data.try_into().unwrap()).into())
        }
        AtomType::FP64 => {
            expect_len(tag, data, 8)?;
            Ok(f64::from_be_bytes(data.try_into().unwrap()))
        }
        _ => Err(CodecError::no_conversion(tag, "float")),
    }
}

pub(crate) fn encode(tag: AtomType, value: f64) -> Result<Vec<u8>> {
    match tag {
        AtomType::FP32 => Ok((value as f32).to_be_bytes().to_vec()),
        AtomType::FP64 => Ok(value.to_be_bytes().to_vec()),
        _ => Err(CodecError::no_conversion(tag, "float")),
    }
}

pub(crate) fn render(tag: AtomType, data: &[u8]) -> Result<String> {
    let value = decode(tag, data)?;
    let digits = if tag == AtomType::FP32 { 8 } else { 17 };
    Ok(format_exponent(value, digits))
}

pub(crate) fn parse(tag: AtomType, text: &str) -> Result<Vec<u8>> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| CodecError::invalid(format!("{tag}: not a valid float: {text:?}")))?;
    encode(tag, value)
}
