//! Configuration-to-bitstream encoding and framed serial transmission.
//!
//! specwire turns nested spectrometer configuration documents into compact
//! bit strings and sends the `step_name`/`purge` frames they contain to a
//! microcontroller, one paced byte at a time.
//!
//! # Crate Structure
//!
//! - [`codec`] — Document model, symbol table, value encoder, transcoder
//! - [`frame`] — Frame extraction, bit packing, sentinel framing, transmitter
//! - [`transport`] — Serial channel opened by device path

/// Re-export codec types.
pub mod codec {
    pub use specwire_codec::*;
}

/// Re-export frame types.
pub mod frame {
    pub use specwire_frame::*;
}

/// Re-export transport types.
pub mod transport {
    pub use specwire_transport::*;
}
