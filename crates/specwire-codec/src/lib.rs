//! Configuration document model and value encoding.
//!
//! A configuration document is a closed tree of [`Node`]s. Encoding replaces
//! every scalar leaf with its wire representation:
//! - known symbolic tokens become their [`SymbolTable`] bit pattern
//! - other strings become the lowercase hex of their UTF-8 bytes
//! - numbers are divided by 10 and written as binary, at least 8 digits wide
//!
//! Encoding is one-way. There is no decoder.

pub mod document;
pub mod encoder;
pub mod error;
pub mod symbols;
pub mod transcoder;

pub use document::{Mapping, Node, Scalar};
pub use encoder::{encode_scalar, Encoder, EncoderConfig, Overflow, MAX_CLAMPED_WORD, WORD_WIDTH};
pub use error::{CodecError, Result};
pub use symbols::SymbolTable;
pub use transcoder::transcode;
