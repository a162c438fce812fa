use crate::error::{CodecError, Result};

// Opaque byte buffers, rendered as `0x` + uppercase hex. A zero-length
// payload renders as the empty string.

pub(crate) fn render(data: &[u8]) -> Result<String> {
    if data.is_empty() {
        return Ok(String::new());
    }
    let mut out = String::with_capacity(2 + data.len() * 2);
    out.push_str("0x");
    for b in data {
        out.push_str(&format!("{b:02X}"));
    }
    Ok(out)
}

pub(crate) fn parse(text: &str) -> Result<Vec<u8>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let hex = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .ok_or_else(|| CodecError::invalid(format!("data must start with 0x: {text:?}")))?;
    if hex.len() % 2 != 0 {
        return Err(CodecError::OddLength(hex.len()));
    }
    hex.as_bytes()
        .chunks_exact(2)
        .map(|pair| {
            let hi = (pair[0] as char).to_digit(16);
            let lo = (pair[1] as char).to_digit(16);
            match (hi, lo) {
                (Some(hi), Some(lo)) => Ok((hi * 16 + lo) as u8),
                _ => Err(CodecError::invalid(format!("bad hex digit in {text:?}"))),
            }
        })
        .collect()
}
