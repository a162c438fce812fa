use crate::error::{CodecError, Result};
use crate::tag::AtomType;

use super::{cstr, data as hex_data};

// IP32 is a dotted-quad IPv4; payloads of 4*k bytes (concatenated
// addresses) render in the hex form instead. IPAD is null-terminated
// address text and shares the C-string machinery.

pub(crate) fn render_ip32(data: &[u8]) -> Result<String> {
    match data.len() {
        4 => Ok(format!("{}.{}.{}.{}", data[0], data[1], data[2], data[3])),
        n if n > 0 && n % 4 == 0 => hex_data::render(data),
        n => Err(CodecError::invalid(format!(
            "IP32 payload must be a multiple of 4 bytes, got {n}"
        ))),
    }
}

pub(crate) fn parse_ip32(tag: AtomType, text: &str) -> Result<Vec<u8>> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        if hex.is_empty() || hex.len() % 8 != 0 {
            return Err(CodecError::invalid(format!(
                "IP32 hex form must be a multiple of 8 hex digits: {text:?}"
            )));
        }
        return hex_data::parse(text);
    }
    let mut out = Vec::with_capacity(4);
    for octet in text.split('.') {
        let value: u8 = octet
            .trim()
            .parse()
            .map_err(|_| CodecError::invalid(format!("{tag}: not an IPv4 address: {text:?}")))?;
        out.push(value);
    }
    if out.len() != 4 {
        return Err(CodecError::invalid(format!(
            "{tag}: not an IPv4 address: {text:?}"
        )));
    }
    Ok(out)
}

pub(crate) fn render_ipad_raw(data: &[u8]) -> Result<String> {
    cstr::render_raw(data)
}

pub(crate) fn render_ipad_delimited(data: &[u8]) -> Result<String> {
    cstr::render_delimited(data)
}

pub(crate) fn parse_ipad_raw(text: &str) -> Result<Vec<u8>> {
    cstr::parse_raw(text)
}

pub(crate) fn parse_ipad_delimited(text: &str) -> Result<Vec<u8>> {
    cstr::parse_delimited(text)
}
