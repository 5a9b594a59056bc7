//! # utf-recode CLI - Streaming Unicode Transcoder
//!
//! Re-encodes a UTF-8/16/32 stream into the named destination encoding.
//! The source encoding is taken from the input's byte order mark.

#[cfg(feature = "cli")]
use std::fs::File;
#[cfg(feature = "cli")]
use std::io::{self, BufWriter, Read, Write};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "cli")]
use tracing::{Level, debug};

#[cfg(feature = "cli")]
use utf_recode::{
    Encoding, StreamingTranscoder, TranscodeOptions, TranscodeReport, detect_source,
};

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI features disabled. Enable with --features cli");
    std::process::exit(1);
}

/// utf-recode: convert a Unicode stream to another encoding form
#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "utf-recode")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Destination encoding (UTF-8, UTF-16BE, UTF-16LE, UTF-32BE, UTF-32LE)
    encoding: String,

    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Input buffer size (KB)
    #[arg(long, default_value = "64")]
    buffer_size: usize,

    /// Drop an incomplete trailing sequence instead of failing
    #[arg(long)]
    allow_truncated: bool,

    /// Print the detected source encoding and exit
    #[arg(long)]
    detect: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Summary format (text, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,
}

#[cfg(feature = "cli")]
#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let destination = Encoding::from_name(&cli.encoding)?;

    let reader: Box<dyn Read> = match cli.input {
        Some(ref path) => {
            debug!("Reading from: {}", path.display());
            Box::new(
                File::open(path)
                    .with_context(|| format!("Failed to open input file: {}", path.display()))?,
            )
        }
        None => Box::new(io::stdin().lock()),
    };

    if cli.detect {
        return detect_command(reader, &cli);
    }

    convert_command(reader, destination, &cli)
}

#[cfg(feature = "cli")]
fn convert_command(reader: Box<dyn Read>, destination: Encoding, cli: &Cli) -> Result<()> {
    let start_time = std::time::Instant::now();

    let options = TranscodeOptions::default()
        .with_buffer_size(cli.buffer_size.saturating_mul(1024))
        .allow_truncated_tail(cli.allow_truncated);
    let mut transcoder = StreamingTranscoder::with_options(destination, options)
        .context("Invalid transcoder options")?;

    let writer: Box<dyn Write> = match cli.output {
        Some(ref path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create output file: {}", path.display())
        })?)),
        None => Box::new(io::stdout().lock()),
    };

    let report = transcoder
        .run(reader, writer)
        .with_context(|| format!("Conversion to {} failed", destination))?;

    print_report(&report, cli, start_time.elapsed())
}

#[cfg(feature = "cli")]
fn detect_command(reader: Box<dyn Read>, cli: &Cli) -> Result<()> {
    let detection = detect_source(reader).context("Failed to read input")?;

    match cli.format {
        OutputFormat::Json => {
            let result = serde_json::json!({
                "encoding": detection.encoding.name(),
                "bom_detected": detection.bom_detected(),
                "bom_len": detection.bom_len,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            println!("Detected encoding: {}", detection.encoding);
            if detection.bom_detected() {
                println!("BOM detected: Yes ({} bytes)", detection.bom_len);
            } else {
                println!("BOM detected: No");
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_report(
    report: &TranscodeReport,
    cli: &Cli,
    elapsed: std::time::Duration,
) -> Result<()> {
    // Stdout may be carrying the converted data, so summaries go to stderr
    match cli.format {
        OutputFormat::Json => {
            let mut summary = serde_json::to_value(report)?;
            summary["processing_time_ms"] = (elapsed.as_millis() as u64).into();
            eprintln!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text => {
            if cli.verbose {
                eprintln!(
                    "Converted {} -> {}: {} bytes -> {} bytes ({} scalars) in {:?}",
                    report.source,
                    report.destination,
                    report.bytes_read,
                    report.bytes_written,
                    report.scalars,
                    elapsed
                );
            }
            if report.truncated_bytes > 0 {
                eprintln!(
                    "warning: dropped {} trailing byte(s) of an incomplete sequence",
                    report.truncated_bytes
                );
            }
        }
    }

    Ok(())
}
