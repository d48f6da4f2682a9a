//! NSG CLI - Command-line tool for NSG JSON drive-test dumps
//!
//! This binary provides command-line interfaces for:
//! - info: capture summary (device, time range, counts)
//! - packets: stream filtered packets as NDJSON/JSON/CSV
//! - dump: re-serialize a (filtered) dump as NSG JSON
//! - export: write coordinates/signalling/events CSV files

use clap::{Args, Parser, Subcommand, ValueEnum};
use nsg_format::timestamp::to_wire;
use nsg_io::export::write_signalling;
use nsg_io::{
    default_output_dir, export_csv, read_document, write_json_subset, Category, Direction,
    Document, DumpOptions, ExportOptions, ExportSummary, Packet, PacketFilter, ParseOptions,
    ParseStats,
};
use std::collections::BTreeMap;
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nsg")]
#[command(about = "Inspect, filter and export NSG JSON drive-test dumps")]
#[command(version)]
struct Cli {
    /// Skip malformed rows and entries instead of failing
    #[arg(long, global = true)]
    lenient: bool,
    /// Longest accepted capture, in seconds (default: 7 days)
    #[arg(long, global = true, value_name = "SECONDS")]
    max_span: Option<i64>,
    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a dump: device, time range, packet and event counts
    ///
    /// Examples:
    ///   nsg info capture.json
    ///   nsg info capture.json --format json
    Info {
        /// Input file (NSG JSON)
        input: PathBuf,
        /// Output format (table, json)
        #[arg(long, value_enum, default_value_t = InfoFormat::Table)]
        format: InfoFormat,
    },
    /// Stream packets, optionally filtered
    ///
    /// Examples:
    ///   nsg packets capture.json --frequency 497
    ///   nsg packets capture.json --category lte --direction down --format csv
    Packets {
        /// Input file (NSG JSON)
        input: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
        /// Output format (ndjson, json-array, csv)
        #[arg(long, value_enum, default_value_t = PacketFormat::Ndjson)]
        format: PacketFormat,
    },
    /// Write the dump back as NSG JSON, optionally keeping only matching packets
    Dump {
        /// Input file (NSG JSON)
        input: PathBuf,
        /// Output file (NSG JSON)
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },
    /// Write coordinates.csv, signalling.csv and events.csv
    Export {
        /// Input file (NSG JSON)
        input: PathBuf,
        /// Target directory (default: output/<input stem>)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Print the export summary as JSON on stdout
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// Keep packets on this channel number
    #[arg(long)]
    frequency: Option<u32>,
    /// Keep packets of this category (gsm, wcdma, lte, nr, esm, emm, unknown)
    #[arg(long, value_parser = parse_category)]
    category: Option<Category>,
    /// Keep packets in this direction (up, down)
    #[arg(long, value_parser = parse_direction)]
    direction: Option<Direction>,
    /// Keep packets whose title contains this text (case-insensitive)
    #[arg(long)]
    title: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> PacketFilter {
        PacketFilter {
            frequency: self.frequency,
            category: self.category,
            direction: self.direction,
            title_contains: self.title.clone(),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum InfoFormat {
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum PacketFormat {
    Ndjson,
    #[value(name = "json-array")]
    JsonArray,
    Csv,
}

fn parse_category(value: &str) -> Result<Category, String> {
    Category::from_name(value).ok_or_else(|| {
        let names: Vec<_> = Category::ALL.iter().map(|c| c.value()).collect();
        format!("unknown category '{}' (expected one of: {})", value, names.join(", "))
    })
}

fn parse_direction(value: &str) -> Result<Direction, String> {
    Direction::from_name(value)
        .ok_or_else(|| format!("unknown direction '{}' (expected up or down)", value))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut options = if cli.lenient {
        ParseOptions::lenient()
    } else {
        ParseOptions::default()
    };
    if let Some(seconds) = cli.max_span {
        options.max_span_seconds = seconds;
    }

    match cli.command {
        Commands::Info { input, format } => {
            handle_info(&input, format, &options)?;
        }
        Commands::Packets {
            input,
            filter,
            format,
        } => {
            handle_packets(&input, &filter.to_filter(), format, &options)?;
        }
        Commands::Dump {
            input,
            output,
            filter,
            pretty,
        } => {
            handle_dump(&input, &output, &filter.to_filter(), pretty, &options)?;
        }
        Commands::Export {
            input,
            output_dir,
            json,
        } => {
            handle_export(&input, output_dir, json, &options)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("nsg={level},nsg_format={level},nsg_io={level}"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load(input: &Path, options: &ParseOptions) -> Result<(Document, ParseStats), Box<dyn Error>> {
    let start = Instant::now();
    let loaded = read_document(input, options)?;
    tracing::debug!("loaded {} in {:.2?}", input.display(), start.elapsed());
    Ok(loaded)
}

#[derive(Debug, Clone, serde::Serialize)]
struct InfoSummary {
    file: PathBuf,
    device: String,
    start: String,
    end: String,
    duration_seconds: i64,
    rows: usize,
    skipped_rows: usize,
    skipped_entries: usize,
    packets: usize,
    events: usize,
    seconds: usize,
    located_seconds: usize,
    categories: BTreeMap<String, usize>,
    frequencies: Vec<u32>,
}

impl InfoSummary {
    fn new(file: &Path, doc: &Document, stats: &ParseStats) -> Self {
        Self {
            file: file.to_path_buf(),
            device: doc.device.clone(),
            start: to_wire(&doc.start),
            end: to_wire(&doc.end),
            duration_seconds: (doc.end - doc.start).num_seconds(),
            rows: stats.rows,
            skipped_rows: stats.skipped_rows,
            skipped_entries: stats.skipped_entries,
            packets: doc.packets.len(),
            events: doc.events.len(),
            seconds: doc.locations.len(),
            located_seconds: doc.locations.located_count(),
            categories: doc
                .category_counts()
                .into_iter()
                .map(|(category, count)| (category.value().to_string(), count))
                .collect(),
            frequencies: doc.frequencies().into_iter().collect(),
        }
    }
}

fn handle_info(
    input: &Path,
    format: InfoFormat,
    options: &ParseOptions,
) -> Result<(), Box<dyn Error>> {
    let (doc, stats) = load(input, options)?;
    let summary = InfoSummary::new(input, &doc, &stats);
    let mut stdout = std::io::stdout().lock();
    match format {
        InfoFormat::Table => print_info_table(&mut stdout, &summary)?,
        InfoFormat::Json => print_info_json(&mut stdout, &summary)?,
    }
    Ok(())
}

fn print_info_table<W: Write>(writer: &mut W, summary: &InfoSummary) -> Result<(), Box<dyn Error>> {
    writeln!(writer, "File:        {}", summary.file.display())?;
    writeln!(writer, "Device:      {}", summary.device)?;
    writeln!(writer, "Start:       {}", summary.start)?;
    writeln!(writer, "End:         {}", summary.end)?;
    writeln!(writer, "Duration:    {}s", summary.duration_seconds)?;
    writeln!(
        writer,
        "Rows:        {} ({} skipped, {} entries skipped)",
        summary.rows, summary.skipped_rows, summary.skipped_entries
    )?;
    writeln!(writer, "Packets:     {}", summary.packets)?;
    writeln!(writer, "Events:      {}", summary.events)?;
    writeln!(
        writer,
        "Located:     {} of {} seconds",
        summary.located_seconds, summary.seconds
    )?;

    if !summary.categories.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "{:<12} {:>8}", "Category", "Packets")?;
        writeln!(writer, "{}", "-".repeat(21))?;
        for (category, count) in &summary.categories {
            writeln!(writer, "{:<12} {:>8}", category, count)?;
        }
    }

    if !summary.frequencies.is_empty() {
        let list: Vec<_> = summary.frequencies.iter().map(u32::to_string).collect();
        writeln!(writer)?;
        writeln!(writer, "Frequencies: {}", list.join(", "))?;
    }
    Ok(())
}

fn print_info_json<W: Write>(writer: &mut W, summary: &InfoSummary) -> Result<(), Box<dyn Error>> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)?;
    Ok(())
}

fn handle_packets(
    input: &Path,
    filter: &PacketFilter,
    format: PacketFormat,
    options: &ParseOptions,
) -> Result<(), Box<dyn Error>> {
    let (doc, _) = load(input, options)?;
    let stdout = std::io::stdout();
    let written = write_packets(&doc, doc.filter_packets(filter), format, stdout.lock())?;
    tracing::debug!("wrote {} of {} packets", written, doc.packets.len());
    Ok(())
}

fn write_packets<'a, I, W>(
    doc: &Document,
    packets: I,
    format: PacketFormat,
    output: W,
) -> Result<usize, Box<dyn Error>>
where
    I: IntoIterator<Item = &'a Packet>,
    W: Write,
{
    if format == PacketFormat::Csv {
        return Ok(write_signalling(doc, packets, output)?);
    }

    let mut writer = BufWriter::new(output);
    let mut count = 0;
    if format == PacketFormat::JsonArray {
        writer.write_all(b"[")?;
    }
    for packet in packets {
        if format == PacketFormat::JsonArray && count > 0 {
            writer.write_all(b",")?;
        }
        serde_json::to_writer(&mut writer, packet)?;
        if format == PacketFormat::Ndjson {
            writer.write_all(b"\n")?;
        }
        count += 1;
    }
    if format == PacketFormat::JsonArray {
        writer.write_all(b"]\n")?;
    }
    writer.flush()?;
    Ok(count)
}

fn handle_dump(
    input: &Path,
    output: &Path,
    filter: &PacketFilter,
    pretty: bool,
    options: &ParseOptions,
) -> Result<(), Box<dyn Error>> {
    let (doc, _) = load(input, options)?;
    let selected: Vec<&Packet> = doc.filter_packets(filter).collect();
    let file = File::create(output)?;
    write_json_subset(&doc, selected.iter().copied(), file, &DumpOptions { pretty })?;

    let mut stderr = std::io::stderr().lock();
    writeln!(
        &mut stderr,
        "Dumped {} of {} packets to {}",
        selected.len(),
        doc.packets.len(),
        output.display()
    )?;
    Ok(())
}

fn handle_export(
    input: &Path,
    output_dir: Option<PathBuf>,
    json: bool,
    options: &ParseOptions,
) -> Result<(), Box<dyn Error>> {
    let (doc, _) = load(input, options)?;
    let opts = ExportOptions {
        output_dir: output_dir.unwrap_or_else(|| default_output_dir(input)),
    };
    let summary = export_csv(&doc, &opts)?;
    if json {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &summary)?;
        writeln!(stdout)?;
    } else {
        report_export_summary(&summary)?;
    }
    Ok(())
}

fn report_export_summary(summary: &ExportSummary) -> Result<(), Box<dyn Error>> {
    let mut stderr = std::io::stderr().lock();
    writeln!(
        &mut stderr,
        "Exported to {} (coordinates: {}, signalling: {}, events: {})",
        summary.output_dir.display(),
        summary.coordinates,
        summary.signalling,
        summary.events
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsg_io::read_document_str;
    use serde_json::Value;

    const SAMPLE: &str = r#"{
        "device": "Pixel 7",
        "starttime": "2023-05-01T10:00:00",
        "endtime": "2023-05-01T10:00:02",
        "data": [
            {"Timestamp": "2023-05-01T10:00:01",
             "Location": {"Latitude": 1.5, "Longitude": 2.5},
             "messages": [
                {"Category": "LTE", "Direction": "Down", "Frequency": 497, "Title": "Paging",
                 "EquipmentTimestamp": "2023-05-01T10:00:01"},
                {"Category": "NR", "Direction": "Up", "Title": "Measurement Report",
                 "EquipmentTimestamp": "2023-05-01T10:00:01"}
             ]}
        ]
    }"#;

    fn sample() -> (Document, ParseStats) {
        read_document_str(SAMPLE, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn parse_category_lists_choices_on_error() {
        assert_eq!(parse_category("Lte").unwrap(), Category::Lte);
        let err = parse_category("umts").unwrap_err();
        assert!(err.contains("umts"));
        assert!(err.contains("wcdma"));
        assert_eq!(parse_direction("UP").unwrap(), Direction::Up);
        assert!(parse_direction("left").is_err());
    }

    #[test]
    fn filter_args_map_onto_packet_filter() {
        let args = FilterArgs {
            frequency: Some(497),
            category: Some(Category::Lte),
            direction: None,
            title: Some("pag".to_string()),
        };
        let filter = args.to_filter();
        let (doc, _) = sample();
        let hits: Vec<_> = doc.filter_packets(&filter).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Paging");
        assert!(FilterArgs::default().to_filter().is_empty());
    }

    #[test]
    fn write_packets_ndjson_one_line_each() {
        let (doc, _) = sample();
        let mut buf = Vec::new();
        let count = write_packets(&doc, &doc.packets, PacketFormat::Ndjson, &mut buf).unwrap();
        assert_eq!(count, 2);
        let text = String::from_utf8(buf).unwrap();
        let values: Vec<Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(values[0]["Frequency"], 497);
        assert_eq!(values[1]["Category"], "nr");
    }

    #[test]
    fn write_packets_json_array_parses() {
        let (doc, _) = sample();
        let mut buf = Vec::new();
        write_packets(&doc, &doc.packets, PacketFormat::JsonArray, &mut buf).unwrap();
        let value: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);

        let mut empty = Vec::new();
        write_packets(&doc, std::iter::empty::<&Packet>(), PacketFormat::JsonArray, &mut empty).unwrap();
        assert_eq!(String::from_utf8(empty).unwrap(), "[]\n");
    }

    #[test]
    fn write_packets_csv_uses_signalling_layout() {
        let (doc, _) = sample();
        let mut buf = Vec::new();
        let count = write_packets(&doc, &doc.packets, PacketFormat::Csv, &mut buf).unwrap();
        assert_eq!(count, 2);
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[1], "lte,Down,,01-10:00:01,Paging,1.5,2.5");
    }

    #[test]
    fn info_table_lists_categories_and_frequencies() {
        let (doc, stats) = sample();
        let summary = InfoSummary::new(Path::new("capture.json"), &doc, &stats);
        let mut buf = Vec::new();
        print_info_table(&mut buf, &summary).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("Device:      Pixel 7"));
        assert!(output.contains("Located:     1 of 3 seconds"));
        assert!(output.contains("Frequencies: 497"));
        assert!(output.lines().any(|line| line.starts_with("lte") && line.ends_with('1')));
    }

    #[test]
    fn info_json_has_counts() {
        let (doc, stats) = sample();
        let summary = InfoSummary::new(Path::new("capture.json"), &doc, &stats);
        let mut buf = Vec::new();
        print_info_json(&mut buf, &summary).unwrap();
        let value: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["packets"], 2);
        assert_eq!(value["duration_seconds"], 2);
        assert_eq!(value["categories"]["nr"], 1);
        assert_eq!(value["frequencies"], serde_json::json!([497]));
    }
}
