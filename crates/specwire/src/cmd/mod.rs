use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Subcommand};
use specwire::codec::{EncoderConfig, Node, Overflow, SymbolTable};
use specwire::frame::{SentinelPolicy, TransmitConfig, TransmitReport, Transmitter};
use specwire::transport::{ChannelConfig, SerialChannel, DEFAULT_BAUD_RATE};
use tracing::info;

use crate::exit::{codec_error, frame_error, io_error, transport_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod encode;
pub mod frames;
pub mod send;
pub mod transmit;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a raw configuration document and write the result as JSON.
    Encode(EncodeArgs),
    /// Send the frames of an already-encoded document.
    Transmit(TransmitArgs),
    /// Encode a raw document and send its frames in one step.
    Send(SendArgs),
    /// List the frames of an encoded document without sending anything.
    Frames(FramesArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Transmit(args) => transmit::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Frames(args) => frames::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodingArgs {
    /// Symbol table: JSON object of token -> bit pattern.
    #[arg(long, value_name = "FILE", env = "SPECWIRE_SYMBOLS")]
    pub symbols: Option<PathBuf>,
    /// Clamp numbers to one word below 0xFF instead of widening them.
    #[arg(long)]
    pub clamp: bool,
}

#[derive(Args, Debug)]
pub struct ChannelArgs {
    /// Serial device to write to (or capture file with --capture).
    #[arg(long, short = 'p', value_name = "PATH", env = "SPECWIRE_PORT")]
    pub port: PathBuf,
    /// Pause after each field word (e.g. 50ms, 1s).
    #[arg(long, default_value = "50ms")]
    pub word_interval: String,
    /// Wait after opening the port before the first frame (e.g. 2s, 0ms).
    #[arg(long, default_value = "2s")]
    pub settle: String,
    /// Line speed for a tty device (raw 8N1). Ignored with --capture.
    #[arg(long, value_name = "RATE", default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
    /// Create or truncate PATH as a regular file instead of opening a device.
    #[arg(long)]
    pub capture: bool,
    /// Send frames whose field words equal 0xFF instead of skipping them.
    #[arg(long)]
    pub allow_sentinel: bool,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Raw configuration document (JSON).
    pub input: PathBuf,
    #[command(flatten)]
    pub encoding: EncodingArgs,
    /// Output file, or "-" for stdout. Default: <INPUT>_bit_hex.json.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TransmitArgs {
    /// Encoded document (JSON), as written by `encode`.
    pub input: PathBuf,
    #[command(flatten)]
    pub channel: ChannelArgs,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Raw configuration document (JSON).
    pub input: PathBuf,
    #[command(flatten)]
    pub encoding: EncodingArgs,
    #[command(flatten)]
    pub channel: ChannelArgs,
}

#[derive(Args, Debug)]
pub struct FramesArgs {
    /// Encoded document (JSON).
    pub input: PathBuf,
    /// Treat fields containing 0xFF words as sendable.
    #[arg(long)]
    pub allow_sentinel: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show build target and feature details.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn read_document(path: &Path) -> CliResult<Node> {
    let bytes = fs::read(path)
        .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
    Node::from_json_slice(&bytes)
        .map_err(|err| codec_error(&format!("invalid document {}", path.display()), err))
}

pub(crate) fn load_symbols(args: &EncodingArgs) -> CliResult<SymbolTable> {
    match &args.symbols {
        Some(path) => SymbolTable::from_path(path)
            .map_err(|err| codec_error(&format!("symbol table {}", path.display()), err)),
        None => Ok(SymbolTable::new()),
    }
}

pub(crate) fn encoder_config(args: &EncodingArgs) -> EncoderConfig {
    EncoderConfig {
        overflow: if args.clamp {
            Overflow::Clamp
        } else {
            Overflow::Widen
        },
    }
}

pub(crate) fn sentinel_policy(allow: bool) -> SentinelPolicy {
    if allow {
        SentinelPolicy::Allow
    } else {
        SentinelPolicy::Reject
    }
}

/// Open the channel, send every frame of `document`, close the channel.
///
/// Durations are validated before the port is touched.
pub(crate) fn transmit_document(document: &Node, args: &ChannelArgs) -> CliResult<TransmitReport> {
    let config = TransmitConfig {
        word_interval: parse_duration(&args.word_interval)?,
        sentinel_policy: sentinel_policy(args.allow_sentinel),
    };
    let channel_config = ChannelConfig {
        settle_delay: parse_duration(&args.settle)?,
        create: args.capture,
        baud_rate: args.baud,
    };

    let channel = SerialChannel::open_with_config(&args.port, &channel_config)
        .map_err(|err| transport_error("open failed", err))?;
    info!(port = %args.port.display(), tty = channel.is_tty(), "channel open");

    let mut transmitter = Transmitter::with_config(channel, config);
    let report = transmitter
        .transmit_document(document)
        .map_err(|err| frame_error("transmit failed", err))?;

    transmitter
        .into_inner()
        .close()
        .map_err(|err| transport_error("close failed", err))?;
    Ok(report)
}

/// Parse `<n>ms` or `<n>s` (bare numbers are seconds). Zero is allowed.
pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("50ms").unwrap(), Duration::from_millis(50));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_duration("0ms").unwrap(), Duration::ZERO);
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert_eq!(parse_duration("").unwrap_err().code, USAGE);
        assert_eq!(parse_duration("fast").unwrap_err().code, USAGE);
        assert_eq!(parse_duration("-5ms").unwrap_err().code, USAGE);
    }

    #[test]
    fn clamp_flag_selects_overflow() {
        let args = EncodingArgs {
            symbols: None,
            clamp: true,
        };
        assert_eq!(encoder_config(&args).overflow, Overflow::Clamp);
        assert!(load_symbols(&args).unwrap().is_empty());
    }

    #[test]
    fn bad_durations_fail_before_opening_port() {
        let args = ChannelArgs {
            port: PathBuf::from("/nonexistent/specwire/port"),
            word_interval: "soon".to_string(),
            settle: "0ms".to_string(),
            baud: DEFAULT_BAUD_RATE,
            capture: false,
            allow_sentinel: false,
        };
        let err = transmit_document(&Node::string("x"), &args).unwrap_err();
        assert_eq!(err.code, USAGE);
    }
}
