//! End-to-end tests: MBO CSV file in, MBP-10 CSV out.
//!
//! Each test writes its input to a temporary directory, runs the full
//! pipeline (or the `reconstruct_mbp` binary) and checks the exact rows.
//!
//! Run with:
//! ```bash
//! cargo test --test integration_test
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use mbp_reconstructor::{
    reconstruct, reconstruct_csv, BookConfig, CsvSource, MarketDataSource, MboEvent, MboRecord,
    MbpWriter, OrderBook, PartialReducePolicy, RunSummary, Side, VecSource, PRICE_SCALE,
};
use tempfile::TempDir;

const HEADER: &str = "ts_recv,ts_event,rtype,publisher_id,instrument_id,action,side,price,size,channel_id,order_id,flags,ts_in_delta,sequence,symbol";

/// One empty bid/ask level group.
const EMPTY_GROUP: &str = ",,0,0,,0,0";

/// Columns per output row: index, 13 passthrough, 10 × 6 levels, symbol, order_id.
const OUTPUT_COLUMNS: usize = 1 + 13 + 60 + 2;

fn pad(groups: usize) -> String {
    EMPTY_GROUP.repeat(groups)
}

fn write_input(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    let mut body = String::from(HEADER);
    body.push('\n');
    for line in lines {
        body.push_str(line);
        body.push('\n');
    }
    fs::write(&path, body).unwrap();
    path
}

/// Run the library pipeline over a CSV file and return the summary and output lines.
fn run_file_with_summary(path: &Path, book: &mut OrderBook) -> (RunSummary, Vec<String>) {
    let records = CsvSource::new(path).unwrap().records().unwrap();
    let mut writer = MbpWriter::new(Vec::new(), book.config().depth);
    let summary = reconstruct_csv(records, book, &mut writer).unwrap();
    let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    (summary, out.lines().map(str::to_string).collect())
}

fn run_file(path: &Path, book: &mut OrderBook) -> Vec<String> {
    run_file_with_summary(path, book).1
}

// ============================================================================
// Library pipeline
// ============================================================================

#[test]
fn test_file_to_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_input(
        &dir,
        "ARL_2025-07-17.mbo.csv",
        &[
            "r1,e1,160,2,1108,A,B,5.510000000,100,0,1,130,165200,1,ARL",
            "r2,e2,160,2,1108,A,A,5.520000000,50,0,2,130,165200,2,ARL",
            "this,line,is,broken",
            "r4,e4,160,2,1108,C,B,5.510000000,100,0,1,130,165200,4,ARL",
            "r5,e5,160,2,1108,R,N,,0,0,0,8,0,5,ARL",
        ],
    );

    let mut book = OrderBook::new();
    let (summary, lines) = run_file_with_summary(&path, &mut book);

    assert_eq!(summary.rows_written, 4);
    assert_eq!(summary.records_skipped, 1);
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with(",ts_recv,ts_event,rtype,"));
    assert!(lines[0].ends_with(",ask_ct_09,symbol,order_id"));

    let expected = [
        format!(
            "0,e1,e1,10,2,1108,A,B,0,5.5100,100,130,165200,1,5.5100,100,1,,0,0{},ARL,1",
            pad(9)
        ),
        format!(
            "1,e2,e2,10,2,1108,A,A,0,5.5200,50,130,165200,2,5.5100,100,1,5.5200,50,1{},ARL,2",
            pad(9)
        ),
        format!(
            "2,e4,e4,10,2,1108,C,B,0,5.5100,100,130,165200,4,,0,0,5.5200,50,1{},ARL,1",
            pad(9)
        ),
        format!("3,e5,e5,10,2,1108,R,N,0,,0,8,0,5{},ARL,0", pad(10)),
    ];
    for (line, expected) in lines[1..].iter().zip(&expected) {
        assert_eq!(line, expected);
        assert_eq!(line.split(',').count(), OUTPUT_COLUMNS);
    }

    assert!(book.is_empty());
    assert_eq!(book.stats().events_processed, 4);
}

#[test]
fn test_source_metadata_from_file_name() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "NVDA_2025-02-03.mbo.csv", &[]);

    let source = CsvSource::new(&path).unwrap();
    assert_eq!(source.metadata().symbol.as_deref(), Some("NVDA"));
    assert_eq!(source.metadata().date.as_deref(), Some("2025-02-03"));
    assert_eq!(source.metadata().provider.as_deref(), Some("csv"));
    assert!(source.metadata().file_size.unwrap_or(0) > 0);
}

#[test]
fn test_header_only_input_writes_header_only() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "empty.mbo.csv", &[]);

    let mut book = OrderBook::new();
    let lines = run_file(&path, &mut book);
    assert_eq!(lines.len(), 1);
}

#[test]
fn test_depth_is_capped_at_ten_levels() {
    let dir = TempDir::new().unwrap();
    let lines: Vec<String> = (1..=12)
        .map(|i| format!("r,e,160,2,1108,A,B,{}.00,{},0,{i},0,0,{i},ARL", 100 + i, i * 10))
        .collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let path = write_input(&dir, "deep.mbo.csv", &refs);

    let mut book = OrderBook::new();
    let out = run_file(&path, &mut book);
    assert_eq!(out.len(), 13);

    let last: Vec<&str> = out[12].split(',').collect();
    assert_eq!(last.len(), OUTPUT_COLUMNS);

    // Best bid first, then strictly descending; 101 and 102 fall off.
    let bid_prices: Vec<&str> = (0..10).map(|level| last[14 + level * 6]).collect();
    assert_eq!(
        bid_prices,
        [
            "112.0000", "111.0000", "110.0000", "109.0000", "108.0000", "107.0000", "106.0000",
            "105.0000", "104.0000", "103.0000"
        ]
    );
    assert_eq!(last[15], "120");
    assert_eq!(book.bid_levels(), 12);
}

#[test]
fn test_partial_cancel_default_bookkeeping() {
    let dir = TempDir::new().unwrap();
    let path = write_input(
        &dir,
        "partial.mbo.csv",
        &[
            "r,e,160,2,1108,A,B,150.00,100,0,1,0,0,1,X",
            "r,e,160,2,1108,C,B,150.00,40,0,1,0,0,2,X",
            "r,e,160,2,1108,C,B,150.00,100,0,1,0,0,3,X",
        ],
    );

    let mut book = OrderBook::new();
    let out = run_file(&path, &mut book);

    assert!(out[2].contains(",150.0000,60,1,"));
    // Recorded size is still 100, so the second cancel empties the level.
    assert!(out[3].contains(",0,3,,0,0,,0,0,"));
    assert!(book.is_empty());
}

#[test]
fn test_partial_cancel_tracking_remaining() {
    let config = BookConfig::default().with_partial_reduce(PartialReducePolicy::TrackRemaining);
    let mut book = OrderBook::with_config(config);

    let price = 150 * PRICE_SCALE;
    let records = vec![
        MboRecord::from_event(MboEvent::add(1, Side::Bid, price, 100)),
        MboRecord::from_event(MboEvent::cancel(1, Side::Bid, price, 40)),
        MboRecord::from_event(MboEvent::cancel(1, Side::Bid, price, 60)),
    ];
    let source = VecSource::new(records);
    let mut writer = MbpWriter::new(Vec::new(), 10);

    let summary = reconstruct(source.records().unwrap(), &mut book, &mut writer).unwrap();
    assert_eq!(summary.rows_written, 3);
    assert!(book.is_empty());
    assert_eq!(book.order_count(), 0);
}

#[test]
fn test_quotes_and_wide_ints_pass_through() {
    let dir = TempDir::new().unwrap();
    let path = write_input(
        &dir,
        "quoted.mbo.csv",
        &[
            "r1,e1,300,70000,-1,A,B,1.00,10,0,1,256,0,1,\"ODD",
            "r2,e2,160,2,1108,A,A,2.00,20,0,2,0,0,2,PLAIN",
        ],
    );

    let mut book = OrderBook::new();
    let (summary, lines) = run_file_with_summary(&path, &mut book);

    assert_eq!(summary.rows_written, 2);
    assert_eq!(summary.records_skipped, 0);
    assert!(lines[1].starts_with("0,e1,e1,10,70000,-1,A,B,0,1.0000,10,256,0,1,"));
    assert!(lines[1].ends_with(",\"ODD,1"));
    assert!(lines[2].ends_with(",PLAIN,2"));
    assert_eq!(book.ask_levels(), 1);
}

#[test]
fn test_missing_input_file() {
    assert!(CsvSource::new("/nonexistent/dir/mbo.csv").is_err());
}

// ============================================================================
// Binary
// ============================================================================

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_reconstruct_mbp"))
}

#[test]
fn test_binary_writes_mbp_csv() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "input.mbo.csv",
        &[
            "r1,e1,160,2,1108,A,B,5.51,100,0,1,130,165200,1,ARL",
            "r2,e2,160,2,1108,T,A,5.52,10,0,0,130,165200,2,ARL",
            "r3,e3,160,2,1108,A,B,not-a-price,10,0,3,130,165200,3,ARL",
        ],
    );

    let output = binary()
        .arg(&input)
        .current_dir(dir.path())
        .env("RUST_LOG", "off")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Processed 2 records"));
    assert!(stdout.contains("Skipped 1 malformed lines."));
    assert!(stdout.contains("Output written to mbp.csv"));

    let written = fs::read_to_string(dir.path().join("mbp.csv")).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[2].starts_with("1,e2,e2,10,2,1108,T,A,0,5.5200,10,"));
    assert!(lines[2].contains(",5.5100,100,1,,0,0,"));
}

#[test]
fn test_binary_without_argument_fails() {
    let dir = TempDir::new().unwrap();
    let output = binary().current_dir(dir.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage:"));
    assert!(!dir.path().join("mbp.csv").exists());
}

#[test]
fn test_binary_with_unreadable_input_fails() {
    let dir = TempDir::new().unwrap();
    let output = binary()
        .arg(dir.path().join("missing.mbo.csv"))
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("mbp.csv").exists());
}
