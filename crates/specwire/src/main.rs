mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "specwire",
    version,
    about = "Encode configuration documents and send their frames over serial"
)]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    /// Only log errors.
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level.effective(cli.quiet));

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    match cmd::run(cli.command, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_transmit_subcommand() {
        let cli = Cli::try_parse_from([
            "specwire",
            "transmit",
            "sample_bit_hex.json",
            "--port",
            "/dev/ttyUSB0",
            "--word-interval",
            "10ms",
        ])
        .expect("transmit args should parse");

        match cli.command {
            Command::Transmit(args) => {
                assert_eq!(args.channel.word_interval, "10ms");
                assert_eq!(args.channel.settle, "2s");
                assert_eq!(args.channel.baud, 115_200);
                assert!(!args.channel.capture);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_send_with_symbols_and_clamp() {
        let cli = Cli::try_parse_from([
            "specwire",
            "send",
            "sample.json",
            "--symbols",
            "symbols.json",
            "--clamp",
            "-p",
            "/dev/ttyACM0",
        ])
        .expect("send args should parse");

        match cli.command {
            Command::Send(args) => {
                assert!(args.encoding.clamp);
                assert_eq!(
                    args.encoding.symbols.as_deref(),
                    Some(std::path::Path::new("symbols.json"))
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["specwire", "frames", "x.json", "--quiet", "--format", "raw"])
            .expect("frames args should parse");
        assert!(cli.quiet);
        assert!(matches!(cli.format, Some(OutputFormat::Raw)));
    }

    #[test]
    fn encode_takes_optional_out() {
        let cli = Cli::try_parse_from(["specwire", "encode", "in.json", "-o", "-"])
            .expect("encode args should parse");
        assert!(matches!(cli.command, Command::Encode(_)));
    }
}
