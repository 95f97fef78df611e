use bytes::BytesMut;
use specwire::codec::Node;
use specwire::frame::{encode_frame, extract_frames, PackedFrame};

use crate::cmd::{read_document, sentinel_policy, FramesArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{hex_bytes, print_frames, FrameRow, OutputFormat};

/// Dry run: show what `transmit` would put on the wire.
pub fn run(args: FramesArgs, format: OutputFormat) -> CliResult<i32> {
    let document = read_document(&args.input)?;
    let policy = sentinel_policy(args.allow_sentinel);

    let mut wire = BytesMut::new();
    let mut rows = Vec::new();
    for (index, frame) in extract_frames(&document).enumerate() {
        let mut row = FrameRow {
            index,
            step_name: field_text(frame.step_name),
            purge: field_text(frame.purge),
            wire: String::new(),
            status: "send",
            reason: None,
        };
        match PackedFrame::pack(&frame, policy) {
            Ok(packed) => {
                let start = wire.len();
                encode_frame(&packed, &mut wire);
                row.wire = hex_bytes(&wire[start..]);
            }
            Err(err) => {
                row.status = "skip";
                row.reason = Some(err.to_string());
            }
        }
        rows.push(row);
    }

    print_frames(&rows, &wire, format);
    Ok(SUCCESS)
}

fn field_text(node: &Node) -> String {
    match node.as_str() {
        Some(bits) => bits.to_string(),
        None => format!("<{}>", node.kind()),
    }
}
