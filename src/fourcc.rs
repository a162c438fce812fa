use serde::Serialize;

use crate::error::CodecError;

/// A 4-byte identifier, as used for atom names and type tags.
///
/// Any byte value is allowed; the printable-ASCII rendering below applies
/// only to display, never to equality.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC([u8; 4]);

impl FourCC {
    pub const fn from_raw(raw: [u8; 4]) -> Self {
        Self(raw)
    }

    pub const fn into_raw(self) -> [u8; 4] {
        self.0
    }

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// True when the identifier renders as 4 characters rather than hex:
    /// all four bytes printable ASCII and the first not one of `# " '` or
    /// space.
    pub fn is_printable(&self) -> bool {
        if !self.0.iter().all(|b| (0x20..=0x7E).contains(b)) {
            return false;
        }
        !matches!(self.0[0], b'#' | b'"' | b'\'' | b' ')
    }

    /// Parse either textual form: 4 printable characters, or `0x` followed
    /// by exactly 8 hex digits.
    pub fn parse(text: &str) -> Result<Self, CodecError> {
        if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            if hex.len() != 8 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(CodecError::invalid(format!(
                    "hex identifier must be 8 hex digits: {text:?}"
                )));
            }
            let value = u32::from_str_radix(hex, 16)
                .map_err(|_| CodecError::invalid(format!("bad hex identifier {text:?}")))?;
            return Ok(Self(value.to_be_bytes()));
        }
        let bytes = text.as_bytes();
        if bytes.len() != 4 {
            return Err(CodecError::invalid(format!(
                "identifier must be 4 characters or 0x + 8 hex digits: {text:?}"
            )));
        }
        Ok(Self([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

impl From<[u8; 4]> for FourCC {
    fn from(raw: [u8; 4]) -> Self {
        Self(raw)
    }
}

impl std::str::FromStr for FourCC {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl std::fmt::Display for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_printable() {
            for b in self.0 {
                write!(f, "{}", b as char)?;
            }
            Ok(())
        } else {
            write!(f, "0x{:08X}", u32::from_be_bytes(self.0))
        }
    }
}

impl std::fmt::Debug for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FourCC({self})")
    }
}

impl Serialize for FourCC {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
