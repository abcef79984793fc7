use std::fmt;

/// Errors raised while decoding a custom-field segment
#[derive(Debug)]
pub enum DecodeError {
    /// A numeric text value could not be parsed
    InvalidNumber { tag: String, value: String },
    /// The binary cursor ran out of bytes in the middle of a field
    UnexpectedEof { needed: usize, remaining: usize },
    /// Beacon payload is not valid hex
    InvalidHex(hex::FromHexError),
    /// Beacon description is not `mode:mask:hex`
    InvalidBeacon(String),
    /// Binary tag missing from the layout table (strict mode only)
    UnknownTag(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::InvalidNumber { tag, value } => {
                write!(f, "Invalid number for tag {}: {:?}", tag, value)
            }
            DecodeError::UnexpectedEof { needed, remaining } => write!(
                f,
                "Unexpected end of data: needed {} byte(s), {} remaining",
                needed, remaining
            ),
            DecodeError::InvalidHex(err) => write!(f, "Invalid hex payload: {}", err),
            DecodeError::InvalidBeacon(msg) => write!(f, "Invalid beacon data: {}", msg),
            DecodeError::UnknownTag(tag) => write!(f, "Unknown binary tag: {}", tag),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::InvalidHex(err) => Some(err),
            _ => None,
        }
    }
}

impl From<hex::FromHexError> for DecodeError {
    fn from(err: hex::FromHexError) -> Self {
        DecodeError::InvalidHex(err)
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
