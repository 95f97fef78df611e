use specwire::codec::Encoder;
use tracing::debug;

use crate::cmd::{encoder_config, load_symbols, read_document, transmit_document, SendArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat};

/// Encode a raw document in memory, exactly once, and send it.
pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let symbols = load_symbols(&args.encoding)?;
    let raw = read_document(&args.input)?;

    let encoder = Encoder::with_config(&symbols, encoder_config(&args.encoding));
    let encoded = encoder.transcode(&raw);
    debug!(symbols = symbols.len(), "document encoded");

    let report = transmit_document(&encoded, &args.channel)?;
    print_report(&report, &args.channel.port, format);
    Ok(SUCCESS)
}
