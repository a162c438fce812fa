use crate::error::{CodecError, Result};

use super::escape::{escape_byte, escape_char, is_printable, unescape, Unescaped};

// Rune strings: a sequence of 32-bit big-endian code points, no terminator.
// Escape rules are shared with the C-string codec but operate on whole code
// points; a zero code point is ordinary data here. A `\xHH` escape can only
// carry code points up to 0xFF, so a non-printable code point above that
// has no rendering and is reported as invalid input.

pub(crate) fn code_points(data: &[u8]) -> Result<Vec<u32>> {
    if data.len() % 4 != 0 {
        return Err(CodecError::invalid(format!(
            "rune string payload must be a multiple of 4 bytes, got {}",
            data.len()
        )));
    }
    Ok(data
        .chunks_exact(4)
        .map(|chunk| u32::from_be_bytes(chunk.try_into().unwrap()))
        .collect())
}

pub(crate) fn render_raw(data: &[u8]) -> Result<String> {
    let mut out = String::new();
    for cp in code_points(data)? {
        match char::from_u32(cp) {
            Some(c @ ('\n' | '\r' | '\\' | '"')) => escape_char(c, &mut out),
            Some(c) if is_printable(c) => out.push(c),
            _ if cp <= 0xFF => escape_byte(cp as u8, &mut out),
            _ => {
                return Err(CodecError::invalid(format!(
                    "code point U+{cp:X} has no rune string rendering"
                )))
            }
        }
    }
    Ok(out)
}

pub(crate) fn render_delimited(data: &[u8]) -> Result<String> {
    Ok(format!("\"{}\"", render_raw(data)?))
}

pub(crate) fn parse_raw(text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for piece in unescape(text)? {
        let cp = match piece {
            Unescaped::Char(c) => c as u32,
            Unescaped::Hex(b) => u32::from(b),
        };
        out.extend_from_slice(&cp.to_be_bytes());
    }
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
