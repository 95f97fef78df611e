use std::path::PathBuf;

/// Errors that can occur while opening or using a serial channel.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the device at the specified path.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The device opened but its line settings could not be applied.
    #[error("failed to configure {path}: {source}")]
    Configure {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The requested line speed has no termios equivalent.
    #[error("unsupported baud rate: {0}")]
    UnsupportedBaud(u32),

    /// The path exists but is a directory.
    #[error("not a device or file: {0}")]
    NotADevice(PathBuf),

    /// An I/O error occurred on the open channel.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
