use crate::cmd::{read_document, transmit_document, TransmitArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat};

/// Send an already-encoded document. The document is not encoded again.
pub fn run(args: TransmitArgs, format: OutputFormat) -> CliResult<i32> {
    let document = read_document(&args.input)?;
    let report = transmit_document(&document, &args.channel)?;
    print_report(&report, &args.channel.port, format);
    Ok(SUCCESS)
}
