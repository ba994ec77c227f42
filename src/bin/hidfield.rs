// SPDX-License-Identifier: MIT

//! Diagnostic utility that parses a HID Report Descriptor, prints the
//! resulting reports and optionally decodes a field of an Input report.
//!
//! # Usage
//!
//! `cargo run --features cli -- --hex "05 01 09 02 ..." --report "05 10 F0" --usage-page 0x01 --usage 0x31`
//!
//! Set `RUST_LOG=hidfield=trace` to see the parser's log messages.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use hidfield::hex::{bytes_to_hex_string, hex_string_to_bytes};
use hidfield::hid::{items, Item};
use hidfield::hut::{usage_name, usage_page_name};
use hidfield::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportType {
    Input,
    Output,
    Feature,
}

impl From<ReportType> for Direction {
    fn from(r: ReportType) -> Direction {
        match r {
            ReportType::Input => Direction::Input,
            ReportType::Output => Direction::Output,
            ReportType::Feature => Direction::Feature,
        }
    }
}

fn parse_number(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };
    parsed.map_err(|e| format!("Invalid number '{s}': {e}"))
}

/// Parse a HID Report Descriptor and print its reports.
#[derive(Parser, Debug)]
#[command(version)]
struct Arguments {
    /// Path to a binary report descriptor
    #[arg(short, long, conflicts_with = "hex", required_unless_present = "hex")]
    file: Option<PathBuf>,

    /// Report descriptor as hex string, e.g. "05 01 09 02"
    #[arg(short = 'x', long)]
    hex: Option<String>,

    /// Print the descriptor's items before the reports
    #[arg(long)]
    items: bool,

    /// Type of report to list
    #[arg(short = 't', long)]
    report_type: Option<ReportType>,

    /// Id of report to list
    #[arg(short = 'i', long, value_parser = parse_number)]
    report_id: Option<u32>,

    /// An Input report as hex string to decode, including the report ID byte if any
    #[arg(short, long, requires_all = ["usage_page", "usage"])]
    report: Option<String>,

    /// Usage Page of the field to decode, decimal or 0x-prefixed hex
    #[arg(short = 'p', long, value_parser = parse_number)]
    usage_page: Option<u32>,

    /// Usage of the field to decode, decimal or 0x-prefixed hex
    #[arg(short, long, value_parser = parse_number)]
    usage: Option<u32>,
}

fn print_items(bytes: &[u8]) {
    for rdesc_item in items(bytes) {
        match rdesc_item {
            Ok(rdesc_item) => {
                let item = rdesc_item.item();
                println!(
                    "{:4}: {:<16} {:?}",
                    rdesc_item.offset(),
                    bytes_to_hex_string(item.bytes()),
                    item.item_type()
                );
            }
            Err(e) => println!("{e}"),
        }
    }
    println!();
}

fn print_reports(table: &ReportTable, args: &Arguments) {
    let directions = match args.report_type {
        Some(r) => vec![Direction::from(r)],
        None => vec![Direction::Input, Direction::Output, Direction::Feature],
    };

    for direction in directions {
        let reports = table
            .reports(direction)
            .iter()
            .filter(|r| args.report_id.map_or(true, |id| u32::from(r.id()) == id));
        for report in reports {
            println!("{direction} {report}");
        }
    }
}

fn decode(
    table: &ReportTable,
    report: &[u8],
    usage_page: UsagePage,
    usage: UsageId,
) -> Result<(), Box<dyn Error>> {
    let location = table
        .locate_input(usage_page, usage)
        .ok_or(FieldError::NotFound { usage_page, usage })?;
    println!(
        "{} ({usage_page:#06X}) {} ({usage:#06X}): bit offset {}, bit size {}",
        usage_page_name(usage_page),
        usage_name(usage_page, usage).unwrap_or_else(|| "Unknown Usage".into()),
        location.bit_offset,
        location.bit_size
    );
    let unsigned = table.read_unsigned(report, usage_page, usage)?;
    let signed = table.read_signed(report, usage_page, usage)?;
    let analog = table.read_analog(report, usage_page, usage, -1.0, 1.0)?;
    println!("  unsigned: {unsigned}");
    println!("  signed:   {signed}");
    println!("  analog:   {analog:.4}");
    println!("  bits:     {:?}", location.read_bitmask(report));
    Ok(())
}

fn run(args: &Arguments) -> Result<(), Box<dyn Error>> {
    let bytes = match (&args.file, &args.hex) {
        (Some(path), _) => std::fs::read(path)?,
        (None, Some(hex)) => hex_string_to_bytes(hex)?,
        (None, None) => return Err("Missing report descriptor".into()),
    };
    tracing::debug!("Read {} descriptor bytes", bytes.len());

    if args.items {
        print_items(&bytes);
    }

    let outcome = parse_report_descriptor(&bytes);
    print_reports(&outcome.table, args);
    let table = outcome.into_result()?;

    if let (Some(report), Some(usage_page), Some(usage)) =
        (&args.report, args.usage_page, args.usage)
    {
        let report = hex_string_to_bytes(report)?;
        decode(&table, &report, UsagePage(usage_page), UsageId(usage))?;
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Arguments::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
