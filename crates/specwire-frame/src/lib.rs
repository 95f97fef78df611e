//! Sentinel-delimited framing for encoded configuration documents.
//!
//! A frame is any mapping in an encoded document that holds both a
//! `step_name` and a `purge` field. On the wire each frame is:
//! - the sentinel byte `0xFF`
//! - the packed words of `step_name`
//! - the packed words of `purge`
//!
//! Field words are written one at a time with a pause after each, so a slow
//! receiver can keep up. There are no length prefixes and no checksums.

pub mod codec;
pub mod error;
pub mod extract;
pub mod packer;
pub mod pacing;
pub mod transmitter;

pub use codec::{encode_frame, PackedFrame, SentinelPolicy, DEFAULT_WORD_INTERVAL, SENTINEL};
pub use error::{FieldError, FrameError, Result};
pub use extract::{extract_frames, Frames, TransmissionFrame, PURGE, STEP_NAME};
pub use packer::{pack, pack_into, WORD_BITS};
pub use pacing::{NoPacing, Pacer, SleepPacer};
pub use transmitter::{TransmitConfig, TransmitReport, Transmitter};
