//! CLI tool reconstructing an MBP-10 CSV from an MBO CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin reconstruct_mbp -- data/mbo.csv
//! ```
//!
//! The output is always written to `mbp.csv` in the working directory.
//! Malformed input lines are logged to stderr and skipped. Log verbosity
//! follows `RUST_LOG` (default `info`).
//!
//! Exit status: 1 if the input argument is missing, either file cannot
//! be opened, the output cannot be written or the input cannot be read to
//! the end; 0 otherwise.

use std::env;
use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use mbp_reconstructor::{
    reconstruct_csv, CsvSource, MarketDataSource, MbpWriter, OrderBook, RunSummary,
};

/// Fixed output file name.
const OUTPUT_FILE: &str = "mbp.csv";

/// Command-line arguments
struct Args {
    /// Input MBO CSV file
    input: PathBuf,
}

enum Command {
    Run(Args),
    Help,
}

fn parse_args() -> std::result::Result<Command, String> {
    let mut input: Option<PathBuf> = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            _ => return Err(format!("Unknown argument: {arg}")),
        }
    }

    let input = input.ok_or("Missing input file.")?;
    Ok(Command::Run(Args { input }))
}

fn program_name() -> String {
    env::args().next().unwrap_or_else(|| "reconstruct_mbp".to_string())
}

fn print_help() {
    eprintln!(
        r#"
Reconstruct MBP-10 from MBO

Reads an MBO CSV (header line first), applies every event to an order
book and writes the top 10 price levels per side after each event.

USAGE:
    {} <mbo_file.csv>

OPTIONS:
    -h, --help    Print this help message

NOTES:
    - Output is written to {OUTPUT_FILE} in the working directory
    - Lines that fail to parse are reported and skipped
    - Set RUST_LOG=debug to see tolerated book anomalies
"#,
        program_name()
    );
}

fn run(args: &Args) -> std::result::Result<RunSummary, String> {
    let records = CsvSource::new(&args.input)
        .and_then(|source| source.records())
        .map_err(|e| format!("Could not open input file {}: {e}", args.input.display()))?;

    let output = File::create(OUTPUT_FILE)
        .map_err(|e| format!("Could not create output file {OUTPUT_FILE}: {e}"))?;

    let mut book = OrderBook::new();
    let mut writer = MbpWriter::new(output, book.config().depth);

    reconstruct_csv(records, &mut book, &mut writer)
        .map_err(|e| format!("Reconstruction into {OUTPUT_FILE} failed: {e}"))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = match parse_args() {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            print_help();
            return;
        }
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Usage: {} <mbo_file.csv>", program_name());
            process::exit(1);
        }
    };

    let start = Instant::now();
    let summary = match run(&args) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    log::debug!(
        "Book: {} adds, {} cancels, {} modifies, {} resets, {} ignored",
        summary.book.adds,
        summary.book.cancels,
        summary.book.modifies,
        summary.book.resets,
        summary.book.ignored_actions
    );

    log::info!("Finished in {:.2?}", start.elapsed());
    println!(
        "Reconstruction complete. Processed {} records.",
        summary.rows_written
    );
    if summary.records_skipped > 0 {
        println!("Skipped {} malformed lines.", summary.records_skipped);
    }
    println!("Output written to {OUTPUT_FILE}");
}
