//! delimrow CLI: decode delimited text files described by table properties.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use delimrow_core::config::DecoderConfig;
use delimrow_core::error::SetupError;
use delimrow_decode::{Decoded, RowDecoder};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "delimrow")]
#[command(about = "Decode multi-character delimited text into typed rows", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode records and print one JSON array per row
    Decode {
        /// Path to the table properties YAML file
        #[arg(short, long)]
        properties: PathBuf,

        /// Input file with one record per line (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Field delimiter (overrides field_delimited)
        #[arg(long)]
        delimiter: Option<String>,
    },

    /// Show the schema described by a properties file
    Describe {
        /// Path to the table properties YAML file
        #[arg(short, long)]
        properties: PathBuf,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("properties file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Setup(#[from] SetupError),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode {
            properties,
            input,
            delimiter,
        } => decode_records(&properties, input.as_deref(), delimiter),
        Commands::Describe { properties } => describe_schema(&properties),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if let CliError::Setup(setup) = &e {
            for hint in setup.suggestions() {
                eprintln!("  hint: {}", hint);
            }
        }
        std::process::exit(1);
    }
}

fn load_config(path: &Path) -> Result<DecoderConfig, CliError> {
    let yaml = fs::read_to_string(path)?;
    let props: BTreeMap<String, String> = serde_yaml::from_str(&yaml)?;
    tracing::debug!(path = %path.display(), keys = props.len(), "loaded table properties");
    Ok(DecoderConfig::from_properties(&props))
}

fn decode_records(
    properties: &Path,
    input: Option<&Path>,
    delimiter: Option<String>,
) -> Result<(), CliError> {
    let mut config = load_config(properties)?;
    if let Some(d) = delimiter {
        config.field_delimited = Some(d);
    }
    let mut decoder = RowDecoder::from_config(&config)?;

    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let summary = decode_stream(&mut decoder, reader, &mut out)?;
    out.flush()?;

    eprintln!("✓ Decoded {} rows", summary.decoded);
    eprintln!("  Skipped (too few fields): {}", summary.skipped);
    eprintln!("  Partially matched: {}", decoder.partial_match_count());
    if summary.lossy > 0 {
        eprintln!("  Lines with invalid UTF-8: {}", summary.lossy);
    }
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct DecodeSummary {
    decoded: u64,
    skipped: u64,
    lossy: u64,
}

/// Decode newline-terminated records from `reader`, writing one JSON array
/// per row to `out`. Invalid UTF-8 is replaced with U+FFFD so a bad line
/// still reaches the decoder instead of ending the run.
fn decode_stream<R: BufRead, W: Write>(
    decoder: &mut RowDecoder,
    mut reader: R,
    out: &mut W,
) -> Result<DecodeSummary, CliError> {
    let mut summary = DecodeSummary::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let bytes = strip_line_ending(&buf);
        let line = String::from_utf8_lossy(bytes);
        if let Cow::Owned(_) = line {
            summary.lossy += 1;
            if summary.lossy == 1 {
                tracing::warn!(line = %line, "record contains invalid UTF-8; bad bytes replaced");
            }
        }
        match decoder.decode(&line) {
            Decoded::Row(row) => {
                serde_json::to_writer(&mut *out, row)?;
                out.write_all(b"\n")?;
                summary.decoded += 1;
            }
            Decoded::Skip => summary.skipped += 1,
        }
    }
    Ok(summary)
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn describe_schema(properties: &Path) -> Result<(), CliError> {
    let config = load_config(properties)?;
    let delimiter = config.delimiter()?;
    let schema = config.build_schema()?;

    println!("Delimiter: {:?}", delimiter);
    println!();
    println!("Columns:");
    for (i, column) in schema.columns().iter().enumerate() {
        match &column.comment {
            Some(comment) => println!("  {}. {} {} -- {}", i, column.name, column.data_type, comment),
            None => println!("  {}. {} {}", i, column.name, column.data_type),
        }
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
