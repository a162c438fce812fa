use crate::tag::AtomType;

pub type Result<T, E = CodecError> = std::result::Result<T, E>;

/// Failure categories surfaced by the codec.
///
/// Display text is stable; callers and tests match on substrings.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Value does not fit the width of the target type.
    #[error("value out of range for {tag}: {value}")]
    Range { tag: AtomType, value: String },

    #[error("invalid escape sequence at position {0}")]
    InvalidEscape(usize),

    #[error("unescaped character {0:?} in string")]
    Unescaped(char),

    #[error("unterminated string, missing null terminator")]
    Unterminated,

    #[error("embedded null at byte {0}")]
    EmbeddedNull(usize),

    #[error("zero denominator")]
    ZeroDenominator,

    #[error("no such conversion: {tag} to {form}")]
    NoSuchConversion { tag: AtomType, form: &'static str },

    #[error("odd length hex input: {0} digits")]
    OddLength(usize),

    #[error("malformed container: declared size exceeded at byte {0}")]
    MalformedContainer(usize),

    #[error("syntax error: {0}")]
    Syntax(String),

    /// Predicate evaluation reached a value of the wrong type.
    #[error("type error in predicate: {0}")]
    PredicateType(String),

    #[error("atom '{parent}' has no child matching '{element}' (resolved path '{partial}')")]
    NotFound {
        parent: String,
        element: String,
        partial: String,
    },

    #[error("invalid container file: header declares {header} bytes but file is {actual}")]
    InvalidContainerFile { header: u64, actual: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        CodecError::InvalidInput(msg.into())
    }

    pub(crate) fn range(tag: AtomType, value: impl ToString) -> Self {
        CodecError::Range {
            tag,
            value: value.to_string(),
        }
    }

    pub(crate) fn no_conversion(tag: AtomType, form: &'static str) -> Self {
        CodecError::NoSuchConversion { tag, form }
    }
}
