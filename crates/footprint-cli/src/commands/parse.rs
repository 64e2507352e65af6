//! Parse command - extract one footprint record from a single report.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use footprint_core::models::config::FootprintConfig;
use footprint_core::{FootprintParser, PureOcrEngine, Vendor};

use super::config::load_config;
use super::output::{format_record, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input PDF report
    #[arg(required = true)]
    input: PathBuf,

    /// Report vendor (dell or hp)
    #[arg(long)]
    vendor: Vendor,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Skip the chart-legend OCR fallback
    #[arg(long)]
    no_ocr: bool,

    /// Report suspicious values in the extracted record
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Parsing {} report: {}", args.vendor, args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);

    pb.set_message("Loading OCR engine...");
    let parser = build_parser(args.vendor, &config, args.no_ocr);

    pb.set_message("Parsing report...");
    let data = fs::read(&args.input)?;
    let record = parser.parse(&data, &file_label(&args.input))?;

    pb.finish_and_clear();

    let Some(record) = record else {
        eprintln!(
            "{} No {} report data found in {}",
            style("⚠").yellow(),
            args.vendor,
            args.input.display()
        );
        return Ok(());
    };

    if args.validate {
        let issues = record.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_record(&record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Parser for `vendor`, with the OCR fallback attached when its models are
/// available and `no_ocr` is not set.
pub fn build_parser(vendor: Vendor, config: &FootprintConfig, no_ocr: bool) -> FootprintParser {
    let parser = FootprintParser::from_config(vendor, &config.extraction);

    if no_ocr || !config.extraction.image_recovery {
        return parser.with_image_recovery(false);
    }

    if !config.ocr.models_available() {
        debug!(
            "OCR models not found in {}, image recovery disabled",
            config.ocr.model_dir.display()
        );
        return parser.with_image_recovery(false);
    }

    match PureOcrEngine::from_config(config.ocr.clone()) {
        Ok(engine) => parser.with_locator(engine),
        Err(e) => {
            warn!("Failed to load OCR engine, image recovery disabled: {}", e);
            parser.with_image_recovery(false)
        }
    }
}

/// File name used in log lines.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
