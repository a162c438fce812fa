use crate::error::{CodecError, Result};

use super::escape::{escape_byte, escape_char, unescape, Unescaped};

// Null-terminated byte strings. The payload may contain bytes that are not
// valid UTF-8; those render as `\xHH` and survive a round-trip.

fn body(data: &[u8]) -> Result<&[u8]> {
    let Some((&last, body)) = data.split_last() else {
        return Err(CodecError::Unterminated);
    };
    if last != 0 {
        return Err(CodecError::Unterminated);
    }
    if let Some(pos) = body.iter().position(|&b| b == 0) {
        return Err(CodecError::EmbeddedNull(pos));
    }
    Ok(body)
}

/// Escaped rendering without surrounding quotes.
pub(crate) fn render_raw(data: &[u8]) -> Result<String> {
    let mut rest = body(data)?;
    let mut out = String::with_capacity(rest.len());
    while !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(text) => {
                text.chars().for_each(|c| escape_char(c, &mut out));
                break;
            }
            Err(err) => {
                let (valid, invalid) = rest.split_at(err.valid_up_to());
                // valid_up_to() guarantees this prefix is UTF-8
                std::str::from_utf8(valid)
                    .unwrap()
                    .chars()
                    .for_each(|c| escape_char(c, &mut out));
                let bad = err.error_len().unwrap_or(invalid.len());
                for &b in &invalid[..bad] {
                    escape_byte(b, &mut out);
                }
                rest = &invalid[bad..];
            }
        }
    }
    Ok(out)
}

pub(crate) fn render_delimited(data: &[u8]) -> Result<String> {
    Ok(format!("\"{}\"", render_raw(data)?))
}

/// Inverse of [`render_raw`]: unescape and append the terminator.
pub(crate) fn parse_raw(text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len() + 1);
    for piece in unescape(text)? {
        match piece {
            Unescaped::Char(c) => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            Unescaped::Hex(b) => out.push(b),
        }
    }
    if let Some(pos) = out.iter().position(|&b| b == 0) {
        return Err(CodecError::EmbeddedNull(pos));
    }
    out.push(0);
    Ok(out)
}

pub(crate) fn parse_delimited(text: &str) -> Result<Vec<u8>> {
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .ok_or_else(|| {
            CodecError::invalid(format!("string must be enclosed in double quotes: {text:?}"))
        })?;
    parse_raw(inner)
}
