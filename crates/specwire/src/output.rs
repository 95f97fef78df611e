use std::io::{IsTerminal, Write};
use std::path::Path;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use specwire::frame::TransmitReport;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    port: &'a str,
    frames_sent: usize,
    frames_skipped: usize,
    bytes_written: usize,
}

pub fn print_report(report: &TransmitReport, port: &Path, format: OutputFormat) {
    let port = port.display().to_string();
    match format {
        OutputFormat::Json => {
            let out = ReportOutput {
                port: &port,
                frames_sent: report.frames_sent,
                frames_skipped: report.frames_skipped,
                bytes_written: report.bytes_written,
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "SENT", "SKIPPED", "BYTES"])
                .add_row(vec![
                    port,
                    report.frames_sent.to_string(),
                    report.frames_skipped.to_string(),
                    report.bytes_written.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "port={} sent={} skipped={} bytes={}",
                port, report.frames_sent, report.frames_skipped, report.bytes_written
            );
        }
        OutputFormat::Raw => {
            println!("{}", report.bytes_written);
        }
    }
}

#[derive(Serialize)]
pub struct EncodeSummary {
    pub input: String,
    pub output: String,
    pub symbols: usize,
    pub frames: usize,
}

pub fn print_encoded(summary: &EncodeSummary, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(summary),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["INPUT", "OUTPUT", "SYMBOLS", "FRAMES"])
                .add_row(vec![
                    summary.input.clone(),
                    summary.output.clone(),
                    summary.symbols.to_string(),
                    summary.frames.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "encoded {} -> {} (symbols={} frames={})",
                summary.input, summary.output, summary.symbols, summary.frames
            );
        }
        OutputFormat::Raw => println!("{}", summary.output),
    }
}

/// One extracted frame as listed by `frames`.
#[derive(Serialize)]
pub struct FrameRow {
    pub index: usize,
    pub step_name: String,
    pub purge: String,
    /// Wire bytes as lowercase hex, sentinel included. Empty when skipped.
    pub wire: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Serialize)]
struct FramesOutput<'a> {
    frames: &'a [FrameRow],
    sendable: usize,
    skipped: usize,
}

/// Print frame rows. `wire` is the concatenated wire image of sendable
/// frames and is only used by the raw format.
pub fn print_frames(rows: &[FrameRow], wire: &[u8], format: OutputFormat) {
    let sendable = rows.iter().filter(|row| row.reason.is_none()).count();
    match format {
        OutputFormat::Json => print_json(&FramesOutput {
            frames: rows,
            sendable,
            skipped: rows.len() - sendable,
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "STEP_NAME", "PURGE", "WIRE", "STATUS"]);
            for row in rows {
                let status = match &row.reason {
                    Some(reason) => format!("{}: {reason}", row.status),
                    None => row.status.to_string(),
                };
                table.add_row(vec![
                    row.index.to_string(),
                    row.step_name.clone(),
                    row.purge.clone(),
                    row.wire.clone(),
                    status,
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in rows {
                print!(
                    "frame={} step_name={} purge={} status={}",
                    row.index, row.step_name, row.purge, row.status
                );
                match &row.reason {
                    Some(reason) => println!(" reason={reason}"),
                    None => println!(" wire={}", row.wire),
                }
            }
        }
        OutputFormat::Raw => print_raw(wire),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn hex_bytes(data: &[u8]) -> String {
    data.iter().map(|byte| format!("{byte:02x}")).collect()
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}
