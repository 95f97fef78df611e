use std::io::{ErrorKind, Write};
use std::time::Duration;

use bytes::BytesMut;
use specwire_codec::Node;
use tracing::{debug, info, trace, warn};

use crate::codec::{encode_frame, PackedFrame, SentinelPolicy, DEFAULT_WORD_INTERVAL};
use crate::error::{FrameError, Result};
use crate::extract::{extract_frames, TransmissionFrame};
use crate::pacing::{Pacer, SleepPacer};

const INITIAL_BUFFER_CAPACITY: usize = 64;

/// Configuration for a transmission session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitConfig {
    /// Pause after each field word. Default: 50 ms.
    pub word_interval: Duration,
    /// Handling of field words equal to the sentinel. Default: reject.
    pub sentinel_policy: SentinelPolicy,
}

impl Default for TransmitConfig {
    fn default() -> Self {
        Self {
            word_interval: DEFAULT_WORD_INTERVAL,
            sentinel_policy: SentinelPolicy::Reject,
        }
    }
}

/// Outcome of one transmission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransmitReport {
    pub frames_sent: usize,
    pub frames_skipped: usize,
    pub bytes_written: usize,
}

/// Writes sentinel-delimited frames to any `Write` channel, one byte at a time.
///
/// Each frame is packed and validated before its sentinel is written, so a
/// malformed frame is skipped without leaving anything on the wire. Channel
/// errors end the transmission.
pub struct Transmitter<T, P = SleepPacer> {
    inner: T,
    pacer: P,
    buf: BytesMut,
    config: TransmitConfig,
}

impl<T: Write> Transmitter<T> {
    /// Create a transmitter with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, TransmitConfig::default())
    }

    /// Create a transmitter that sleeps `config.word_interval` between words.
    pub fn with_config(inner: T, config: TransmitConfig) -> Self {
        Self::with_pacer(inner, config, SleepPacer::new(config.word_interval))
    }
}

impl<T: Write, P: Pacer> Transmitter<T, P> {
    /// Create a transmitter with an explicit pacer. `config.word_interval` is
    /// not used; the pacer decides how long to wait.
    pub fn with_pacer(inner: T, config: TransmitConfig, pacer: P) -> Self {
        Self {
            inner,
            pacer,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Extract every frame from an encoded document and send it.
    pub fn transmit_document(&mut self, document: &Node) -> Result<TransmitReport> {
        self.transmit(extract_frames(document))
    }

    /// Send frames in order.
    ///
    /// A frame with a malformed field is logged and skipped. The first
    /// channel error is returned and nothing after it is sent.
    pub fn transmit<'a, I>(&mut self, frames: I) -> Result<TransmitReport>
    where
        I: IntoIterator<Item = TransmissionFrame<'a>>,
    {
        let mut report = TransmitReport::default();

        for (index, frame) in frames.into_iter().enumerate() {
            let packed = match PackedFrame::pack(&frame, self.config.sentinel_policy) {
                Ok(packed) => packed,
                Err(err) => {
                    warn!(frame = index, error = %err, "skipping malformed frame");
                    report.frames_skipped += 1;
                    continue;
                }
            };

            report.bytes_written += self.send_frame(&packed)?;
            report.frames_sent += 1;
            debug!(
                frame = index,
                step_name_words = packed.step_name.len(),
                purge_words = packed.purge.len(),
                "sent frame"
            );
        }

        info!(
            sent = report.frames_sent,
            skipped = report.frames_skipped,
            bytes = report.bytes_written,
            "transmission complete"
        );
        Ok(report)
    }

    /// Write one packed frame: the sentinel, then each field word followed by
    /// a pause. Returns the number of bytes written.
    pub fn send_frame(&mut self, frame: &PackedFrame) -> Result<usize> {
        self.buf.clear();
        encode_frame(frame, &mut self.buf);

        for position in 0..self.buf.len() {
            let byte = self.buf[position];
            write_byte(&mut self.inner, byte)?;
            trace!(byte = format_args!("{byte:#04x}"), "wrote byte");
            // No pause after the sentinel itself.
            if position > 0 {
                self.pacer.pause();
            }
        }

        Ok(self.buf.len())
    }

    /// Borrow the underlying channel.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying channel.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the transmitter and return the channel.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current configuration.
    pub fn config(&self) -> &TransmitConfig {
        &self.config
    }
}

fn write_byte<T: Write>(inner: &mut T, byte: u8) -> Result<()> {
    loop {
        match inner.write(&[byte]) {
            Ok(0) => return Err(FrameError::ConnectionClosed),
            Ok(_) => break,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }

    loop {
        match inner.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
}
