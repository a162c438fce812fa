use crate::error::{CodecError, Result};

/// One unescaped element of a string body.
///
/// `\xHH` stays a bare byte/code-point value; everything else is a char.
/// The C-string codec turns chars into UTF-8 bytes, the rune-string codec
/// into 32-bit code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unescaped {
    Char(char),
    Hex(u8),
}

/// Whether a code point prints as itself in the text renderings.
///
/// Space prints; every other whitespace does not. Controls, invisible
/// format and joiner characters, variation selectors, private use and
/// noncharacters all render escaped.
pub(crate) fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    if c.is_control() || c.is_whitespace() {
        return false;
    }
    let cp = u32::from(c);
    // noncharacters: U+FDD0..=U+FDEF and the last two code points of
    // every plane
    if (0xFDD0..=0xFDEF).contains(&cp) || (cp & 0xFFFE) == 0xFFFE {
        return false;
    }
    !matches!(
        cp,
        0x00AD
            | 0x034F
            | 0x061C
            | 0x115F..=0x1160
            | 0x17B4..=0x17B5
            | 0x180B..=0x180F
            | 0x200B..=0x200F
            | 0x202A..=0x202E
            | 0x2060..=0x206F
            | 0x3164
            | 0xE000..=0xF8FF
            | 0xFE00..=0xFE0F
            | 0xFEFF
            | 0xFFA0
            | 0xFFF0..=0xFFFB
            | 0x1BCA0..=0x1BCA3
            | 0x1D173..=0x1D17A
            | 0xE0000..=0xE0FFF
            | 0xF0000..=0x10FFFF
    )
}

/// Append `c` to `out`, escaped per the string codec rules. A rune that is
/// not printable is emitted as the `\xHH` escapes of its UTF-8 bytes.
pub(crate) fn escape_char(c: char, out: &mut String) {
    match c {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\\' => out.push_str("\\\\"),
        '"' => out.push_str("\\\""),
        c if is_printable(c) => out.push(c),
        c => {
            let mut buf = [0u8; 4];
            for &b in c.encode_utf8(&mut buf).as_bytes() {
                escape_byte(b, out);
            }
        }
    }
}

pub(crate) fn escape_byte(b: u8, out: &mut String) {
    out.push_str(&format!("\\x{b:02X}"));
}

/// Undo the escaping of a string body. Rejects unescaped control
/// characters, `"` and `\`, and malformed escape sequences.
pub(crate) fn unescape(text: &str) -> Result<Vec<Unescaped>> {
    let mut out = Vec::new();
    let mut chars = text.char_indices();
    while let Some((pos, c)) = chars.next() {
        match c {
            '\\' => {
                let Some((_, esc)) = chars.next() else {
                    return Err(CodecError::InvalidEscape(pos));
                };
                match esc {
                    'n' => out.push(Unescaped::Char('\n')),
                    'r' => out.push(Unescaped::Char('\r')),
                    '\\' => out.push(Unescaped::Char('\\')),
                    '"' => out.push(Unescaped::Char('"')),
                    'x' => {
                        let hi = chars.next().and_then(|(_, c)| c.to_digit(16));
                        let lo = chars.next().and_then(|(_, c)| c.to_digit(16));
                        match (hi, lo) {
                            (Some(hi), Some(lo)) => {
                                out.push(Unescaped::Hex((hi * 16 + lo) as u8));
                            }
                            _ => return Err(CodecError::InvalidEscape(pos)),
                        }
                    }
                    _ => return Err(CodecError::InvalidEscape(pos)),
                }
            }
            '"' => return Err(CodecError::Unescaped('"')),
            c if c.is_control() => return Err(CodecError::Unescaped(c)),
            c => out.push(Unescaped::Char(c)),
        }
    }
    Ok(out)
}
