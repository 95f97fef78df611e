/// Errors that can occur while loading documents or symbol tables.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The symbol table file could not be read.
    #[error("failed to load symbol table: {0}")]
    LoadFailed(String),

    /// A symbol table entry is not a non-empty string of binary digits.
    #[error("invalid bit pattern for token {token:?}: {pattern:?}")]
    InvalidPattern { token: String, pattern: String },

    /// The input is not valid JSON (or not the expected JSON shape).
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
