use std::fs;
use std::path::{Path, PathBuf};

use specwire::codec::Encoder;
use specwire::frame::extract_frames;
use tracing::debug;

use crate::cmd::{encoder_config, load_symbols, read_document, EncodeArgs};
use crate::exit::{codec_error, io_error, CliResult, SUCCESS};
use crate::output::{print_encoded, EncodeSummary, OutputFormat};

const OUTPUT_SUFFIX: &str = "_bit_hex.json";

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let symbols = load_symbols(&args.encoding)?;
    let raw = read_document(&args.input)?;

    let encoder = Encoder::with_config(&symbols, encoder_config(&args.encoding));
    let encoded = encoder.transcode(&raw);
    let text = encoded
        .to_json_pretty()
        .map_err(|err| codec_error("failed rendering encoded document", err))?;

    let out = args
        .out
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    if out.as_os_str() == "-" {
        println!("{text}");
        return Ok(SUCCESS);
    }

    fs::write(&out, format!("{text}\n"))
        .map_err(|err| io_error(&format!("failed writing {}", out.display()), err))?;
    debug!(output = %out.display(), "wrote encoded document");

    let summary = EncodeSummary {
        input: args.input.display().to_string(),
        output: out.display().to_string(),
        symbols: symbols.len(),
        frames: extract_frames(&encoded).count(),
    };
    print_encoded(&summary, format);

    Ok(SUCCESS)
}

/// `dir/sample.json` -> `dir/sample_bit_hex.json`.
pub(crate) fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    input.with_file_name(format!("{stem}{OUTPUT_SUFFIX}"))
}
