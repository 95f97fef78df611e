use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};
use specwire_codec::Node;
use tracing::warn;

use crate::error::{FieldError, FrameError, Result};
use crate::extract::{TransmissionFrame, PURGE, STEP_NAME};
use crate::packer::pack;

/// Marks the start of a frame on the wire. Reserved for that use only.
pub const SENTINEL: u8 = 0xFF;

/// Default pause after each field word: 50 ms.
pub const DEFAULT_WORD_INTERVAL: Duration = Duration::from_millis(50);

/// What to do when a packed field word equals [`SENTINEL`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SentinelPolicy {
    /// Abandon the frame before anything is written.
    #[default]
    Reject,
    /// Send the word anyway and log a warning.
    Allow,
}

/// A frame whose fields have been packed and checked, ready to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedFrame {
    pub step_name: Bytes,
    pub purge: Bytes,
}

impl PackedFrame {
    /// Pack both fields of `frame`.
    ///
    /// Fails with [`FrameError::InvalidField`] if either field is not a bit
    /// string, or contains the sentinel under [`SentinelPolicy::Reject`].
    pub fn pack(frame: &TransmissionFrame<'_>, policy: SentinelPolicy) -> Result<Self> {
        Ok(Self {
            step_name: pack_field(STEP_NAME, frame.step_name, policy)?,
            purge: pack_field(PURGE, frame.purge, policy)?,
        })
    }

    /// Number of field words (everything after the sentinel).
    pub fn word_count(&self) -> usize {
        self.step_name.len() + self.purge.len()
    }

    /// Total bytes on the wire, sentinel included.
    pub fn wire_size(&self) -> usize {
        1 + self.word_count()
    }
}

fn pack_field(field: &'static str, node: &Node, policy: SentinelPolicy) -> Result<Bytes> {
    let bits = node.as_str().ok_or_else(|| FrameError::InvalidField {
        field,
        source: FieldError::NotABitString(node.kind()),
    })?;
    let words = pack(bits).map_err(|source| FrameError::InvalidField { field, source })?;

    if let Some(index) = words.iter().position(|&word| word == SENTINEL) {
        match policy {
            SentinelPolicy::Reject => {
                return Err(FrameError::InvalidField {
                    field,
                    source: FieldError::Sentinel(index),
                });
            }
            SentinelPolicy::Allow => {
                warn!(field, index, "field word equals frame sentinel");
            }
        }
    }

    Ok(words)
}

/// Encode a packed frame into its wire layout.
///
/// ```text
/// ┌──────────┬──────────────────────┬──────────────────┐
/// │ 0xFF     │ step_name words      │ purge words      │
/// │ sentinel │ (packed, MSB first)  │ (packed)         │
/// └──────────┴──────────────────────┴──────────────────┘
/// ```
pub fn encode_frame(frame: &PackedFrame, dst: &mut BytesMut) {
    dst.reserve(frame.wire_size());
    dst.put_u8(SENTINEL);
    dst.put_slice(&frame.step_name);
    dst.put_slice(&frame.purge);
}
