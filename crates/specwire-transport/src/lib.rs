//! Serial channel abstraction.
//!
//! This is the lowest layer of specwire. A [`SerialChannel`] is an exclusively
//! owned, blocking byte sink opened by device path. On Unix a tty is
//! switched to raw 8N1 at the configured line speed before the first write,
//! so bytes reach the wire untranslated. Regular files (capture mode) are
//! written as-is.

pub mod channel;
pub mod config;
pub mod error;
#[cfg(unix)]
mod termios;

pub use channel::SerialChannel;
pub use config::{ChannelConfig, DEFAULT_BAUD_RATE, DEFAULT_SETTLE_DELAY};
pub use error::{Result, TransportError};
