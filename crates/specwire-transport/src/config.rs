use std::time::Duration;

/// Time the receiver needs after the port opens before it accepts data.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Line speed of the receiving microcontroller.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Controls how a [`SerialChannel`](crate::SerialChannel) is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Blocking wait after a successful open. Zero disables it.
    pub settle_delay: Duration,
    /// Create (or truncate) the target as a regular capture file instead of
    /// requiring an existing device node.
    pub create: bool,
    /// Line speed applied when the target is a tty (8N1, raw). Ignored for
    /// regular files.
    pub baud_rate: u32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            create: false,
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

impl ChannelConfig {
    /// Config for writing into a capture file with no settle wait.
    pub fn capture() -> Self {
        Self {
            settle_delay: Duration::ZERO,
            create: true,
            ..Self::default()
        }
    }
}
