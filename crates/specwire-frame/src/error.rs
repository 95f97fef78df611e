/// Why a single frame field cannot be sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The bit string contains something other than `0` or `1`.
    #[error("invalid bit {found:?} at position {position}")]
    InvalidBit { position: usize, found: char },

    /// The field is not an encoded string.
    #[error("expected an encoded bit string, found a {0}")]
    NotABitString(&'static str),

    /// A packed word equals the frame sentinel.
    #[error("packs to the sentinel 0xFF at word {0}")]
    Sentinel(usize),
}

/// Errors that can occur while framing or transmitting.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// One field of a frame is malformed. Only that frame is affected.
    #[error("field `{field}` {source}")]
    InvalidField {
        field: &'static str,
        #[source]
        source: FieldError,
    },

    /// An I/O error occurred while writing to the channel.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel accepted zero bytes.
    #[error("channel closed (incomplete write)")]
    ConnectionClosed,
}

impl FrameError {
    /// True when the error ends the whole transmission rather than one frame.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, FrameError::InvalidField { .. })
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
