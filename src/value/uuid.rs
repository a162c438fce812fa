use crate::error::{CodecError, Result};
use crate::tag::AtomType;

use super::expect_len;

// 16-byte UUIDs, canonical 8-4-4-4-12 uppercase hex.

const GROUPS: [usize; 5] = [4, 2, 2, 2, 6];

pub(crate) fn render(tag: AtomType, data: &[u8]) -> Result<String> {
    expect_len(tag, data, 16)?;
    let mut out = String::with_capacity(36);
    let mut offset = 0;
    for (i, len) in GROUPS.into_iter().enumerate() {
        if i > 0 {
            out.push('-');
        }
        for b in &data[offset..offset + len] {
            out.push_str(&format!("{b:02X}"));
        }
        offset += len;
    }
    Ok(out)
}

pub(crate) fn parse(tag: AtomType, text: &str) -> Result<Vec<u8>> {
    // optionally enclosed in double quotes
    let text = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    let bad = || CodecError::invalid(format!("{tag}: not a UUID: {text:?}"));
    let mut out = Vec::with_capacity(16);
    let mut parts = text.split('-');
    for len in GROUPS {
        let part = parts.next().ok_or_else(bad)?;
        if part.len() != len * 2 {
            return Err(bad());
        }
        for pair in part.as_bytes().chunks_exact(2) {
            let digits = std::str::from_utf8(pair).map_err(|_| bad())?;
            out.push(u8::from_str_radix(digits, 16).map_err(|_| bad())?);
        }
    }
    if parts.next().is_some() {
        return Err(bad());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: [u8; 16] = [
        0x64, 0x88, 0x14, 0x54, 0xE2, 0x4E, 0x47, 0x80, 0x89, 0xDD, 0x3C, 0x27, 0xD7, 0xCA, 0xBE,
        0x82,
    ];

    #[test]
    fn canonical_form() {
        let text = render(AtomType::UUID, &RAW).unwrap();
        assert_eq!(text, "64881454-E24E-4780-89DD-3C27D7CABE82");
        assert_eq!(parse(AtomType::UUID, &text).unwrap(), RAW.to_vec());
    }

    #[test]
    fn quoted_form_accepted() {
        let quoted = "\"64881454-E24E-4780-89DD-3C27D7CABE82\"";
        assert_eq!(parse(AtomType::UUID, quoted).unwrap(), RAW.to_vec());
    }

    #[test]
    fn malformed_rejected() {
        assert!(parse(AtomType::UUID, "64881454E24E478089DD3C27D7CABE82").is_err());
        assert!(parse(AtomType::UUID, "64881454-E24E-4780-89DD").is_err());
    }
}
