use num_enum::TryFromPrimitive;
use serde::Serialize;

use crate::error::CodecError;
use crate::fourcc::FourCC;

/// The closed set of type tags, keyed by the big-endian u32 of the 4-ASCII
/// tag as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u32)]
pub enum AtomType {
    /// Boolean stored in a 32-bit field, only 0 and 1 are valid
    UI01 = 0x5549_3031,
    UI08 = 0x5549_3038,
    UI16 = 0x5549_3136,
    UI32 = 0x5549_3332,
    UI64 = 0x5549_3634,
    SI08 = 0x5349_3038,
    SI16 = 0x5349_3136,
    SI32 = 0x5349_3332,
    SI64 = 0x5349_3634,
    /// IEEE 754 binary32
    FP32 = 0x4650_3332,
    /// IEEE 754 binary64
    FP64 = 0x4650_3634,
    /// unsigned fixed-point, raw / 2^16
    UF32 = 0x5546_3332,
    /// unsigned fixed-point, raw / 2^32
    UF64 = 0x5546_3634,
    SF32 = 0x5346_3332,
    SF64 = 0x5346_3634,
    /// unsigned rational, numerator then denominator, two u16
    UR32 = 0x5552_3332,
    UR64 = 0x5552_3634,
    SR32 = 0x5352_3332,
    SR64 = 0x5352_3634,
    /// 4-byte character code
    FC32 = 0x4643_3332,
    /// IPv4, dotted-quad text form
    IP32 = 0x4950_3332,
    /// IP address as null-terminated text
    IPAD = 0x4950_4144,
    /// null-terminated byte string
    CSTR = 0x4353_5452,
    /// sequence of 32-bit big-endian code points, no terminator
    USTR = 0x5553_5452,
    DATA = 0x4441_5441,
    /// aliased spelling of DATA
    CNCT = 0x434E_4354,
    /// 32-bit enumeration, identical to SI32
    ENUM = 0x454E_554D,
    /// 16-byte UUID
    UUID = 0x5555_4944,
    NULL = 0x4E55_4C4C,
    /// container, zero payload, carries children
    CONT = 0x434F_4E54,
}

/// Payload width class of a type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthClass {
    Fixed(usize),
    Variable,
    Empty,
}

impl AtomType {
    pub const ALL: [AtomType; 30] = [
        AtomType::UI01,
        AtomType::UI08,
        AtomType::UI16,
        AtomType::UI32,
        AtomType::UI64,
        AtomType::SI08,
        AtomType::SI16,
        AtomType::SI32,
        AtomType::SI64,
        AtomType::FP32,
        AtomType::FP64,
        AtomType::UF32,
        AtomType::UF64,
        AtomType::SF32,
        AtomType::SF64,
        AtomType::UR32,
        AtomType::UR64,
        AtomType::SR32,
        AtomType::SR64,
        AtomType::FC32,
        AtomType::IP32,
        AtomType::IPAD,
        AtomType::CSTR,
        AtomType::USTR,
        AtomType::DATA,
        AtomType::CNCT,
        AtomType::ENUM,
        AtomType::UUID,
        AtomType::NULL,
        AtomType::CONT,
    ];

    pub fn from_raw(raw: [u8; 4]) -> Result<Self, CodecError> {
        Self::try_from(u32::from_be_bytes(raw)).map_err(|_| {
            CodecError::invalid(format!("unknown type tag {}", FourCC::from_raw(raw)))
        })
    }

    /// Parse the literal 4-character tag text.
    pub fn parse(text: &str) -> Result<Self, CodecError> {
        let bytes: [u8; 4] = text
            .as_bytes()
            .try_into()
            .map_err(|_| CodecError::invalid(format!("type tag must be 4 characters: {text:?}")))?;
        Self::from_raw(bytes)
    }

    pub fn into_raw(self) -> [u8; 4] {
        (self as u32).to_be_bytes()
    }

    pub fn fourcc(self) -> FourCC {
        FourCC::from_raw(self.into_raw())
    }

    pub fn width(self) -> WidthClass {
        use AtomType::*;
        match self {
            UI08 | SI08 => WidthClass::Fixed(1),
            UI16 | SI16 => WidthClass::Fixed(2),
            UI01 | UI32 | SI32 | FP32 | UF32 | SF32 | UR32 | SR32 | FC32 | ENUM => {
                WidthClass::Fixed(4)
            }
            UI64 | SI64 | FP64 | UF64 | SF64 | UR64 | SR64 => WidthClass::Fixed(8),
            UUID => WidthClass::Fixed(16),
            IP32 | IPAD | CSTR | USTR | DATA | CNCT => WidthClass::Variable,
            NULL | CONT => WidthClass::Empty,
        }
    }

    /// The zero-initialized payload a freshly created or retyped atom gets.
    ///
    /// Null-terminated string types get just the terminator so the payload
    /// decodes as the empty string; IP32 gets one zeroed address.
    pub fn empty_payload(self) -> Vec<u8> {
        match self.width() {
            WidthClass::Fixed(n) => vec![0; n],
            WidthClass::Variable => match self {
                AtomType::CSTR | AtomType::IPAD => vec![0],
                AtomType::IP32 => vec![0; 4],
                _ => Vec::new(),
            },
            WidthClass::Empty => Vec::new(),
        }
    }

    pub fn is_container(self) -> bool {
        self == AtomType::CONT
    }
}

impl std::str::FromStr for AtomType {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl std::fmt::Display for AtomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for b in self.into_raw() {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl Serialize for AtomType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
