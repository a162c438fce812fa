use crate::error::{CodecError, Result};
use crate::fourcc::FourCC;
use crate::tag::AtomType;

use super::expect_len;

// FC32 shares the printability rule with atom names: 4 printable ASCII
// characters whose first is not `# " '` or space, otherwise hex.

fn code(tag: AtomType, data: &[u8]) -> Result<FourCC> {
    expect_len(tag, data, 4)?;
    Ok(FourCC::from_raw(data.try_into().unwrap()))
}

pub(crate) fn render_raw(tag: AtomType, data: &[u8]) -> Result<String> {
    Ok(code(tag, data)?.to_string())
}

pub(crate) fn render_delimited(tag: AtomType, data: &[u8]) -> Result<String> {
    let code = code(tag, data)?;
    if code.is_printable() {
        Ok(format!("'{code}'"))
    } else {
        Ok(code.to_string())
    }
}

pub(crate) fn parse(tag: AtomType, text: &str) -> Result<Vec<u8>> {
    if let Some(inner) = text.strip_prefix('\'') {
        let inner = inner
            .strip_suffix('\'')
            .ok_or_else(|| CodecError::invalid(format!("{tag}: unclosed quote: {text:?}")))?;
        if inner.len() != 4 {
            return Err(CodecError::invalid(format!(
                "{tag}: quoted code must be 4 characters: {text:?}"
            )));
        }
        return Ok(inner.as_bytes().to_vec());
    }
    // bare 4 characters or 0x + 8 hex digits
    Ok(FourCC::parse(text)?.into_raw().to_vec())
}
