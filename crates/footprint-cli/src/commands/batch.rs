//! Batch command - parse many reports of one vendor.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use footprint_core::{DeviceCarbonFootprint, FootprintParser, Vendor};

use super::config::load_config;
use super::output::{csv_row, format_record, OutputFormat, CSV_HEADER};
use super::parse::{build_parser, file_label};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching the input reports
    #[arg(required = true)]
    input: String,

    /// Report vendor (dell or hp)
    #[arg(long)]
    vendor: Vendor,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write a summary CSV with one row per input file
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Skip the chart-legend OCR fallback
    #[arg(long)]
    no_ocr: bool,
}

enum Outcome {
    Parsed(DeviceCarbonFootprint),
    /// No pattern matched the document.
    NoMatch,
    Failed(String),
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    outcome: Outcome,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} {} reports to process",
        style("ℹ").blue(),
        files.len(),
        args.vendor
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = build_parser(args.vendor, &config, args.no_ocr);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let outcome = match parse_file(&path, &parser) {
            Ok(Some(record)) => Outcome::Parsed(record),
            Ok(None) => Outcome::NoMatch,
            Err(e) => {
                let error_msg = e.to_string();
                if !args.continue_on_error {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
                warn!("Failed to process {}: {}", path.display(), error_msg);
                Outcome::Failed(error_msg)
            }
        };

        results.push(FileResult {
            path,
            outcome,
            processing_time_ms: file_start.elapsed().as_millis() as u64,
        });
        pb.inc(1);
    }

    pb.finish_and_clear();

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let Outcome::Parsed(record) = &result.outcome {
                let stem = result.path.file_stem().and_then(|s| s.to_str()).unwrap_or("report");
                let output_path = output_dir.join(format!("{}.{}", stem, args.format.extension()));

                fs::write(&output_path, format_record(record, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let parsed = results.iter().filter(|r| matches!(r.outcome, Outcome::Parsed(_))).count();
    let unmatched = results.iter().filter(|r| matches!(r.outcome, Outcome::NoMatch)).count();
    let failed: Vec<_> = results
        .iter()
        .filter_map(|r| match &r.outcome {
            Outcome::Failed(e) => Some((&r.path, e)),
            _ => None,
        })
        .collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} parsed, {} without data, {} failed",
        style(parsed).green(),
        style(unmatched).yellow(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for (path, error) in &failed {
            println!("  - {}: {}", path.display(), error);
        }
    }

    Ok(())
}

fn parse_file(path: &Path, parser: &FootprintParser) -> anyhow::Result<Option<DeviceCarbonFootprint>> {
    let data = fs::read(path)?;
    Ok(parser.parse(&data, &file_label(path))?)
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status", "processing_time_ms", "error"];
    header.extend(CSV_HEADER);
    wtr.write_record(&header)?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        let time = result.processing_time_ms.to_string();

        let (status, error, fields) = match &result.outcome {
            Outcome::Parsed(record) => ("success", "", csv_row(record).to_vec()),
            Outcome::NoMatch => ("no_match", "", vec![String::new(); CSV_HEADER.len()]),
            Outcome::Failed(e) => ("error", e.as_str(), vec![String::new(); CSV_HEADER.len()]),
        };

        let mut row = vec![filename.to_string(), status.to_string(), time, error.to_string()];
        row.extend(fields);
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
