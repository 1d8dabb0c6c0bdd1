//! Scan command - OCR a receipt image and extract its data.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use rcpt_core::ocr::{VisionClient, scan_receipt};
use rcpt_core::receipt::HeuristicReceiptParser;

use super::parse::{OutputFormat, format_receipt, report, write_output};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Receipt image (PNG, JPEG, ...)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Validate extracted data
    #[arg(long)]
    validate: bool,

    /// Print fields that could not be detected
    #[arg(long)]
    show_warnings: bool,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let image = fs::read(&args.input)?;
    info!("Scanning image: {} ({} bytes)", args.input.display(), image.len());

    let client = VisionClient::from_config(&config.ocr)?;
    let parser = HeuristicReceiptParser::from_config(&config.extraction);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Recognizing text...");

    let result = scan_receipt(&client, &parser, &image).await;

    pb.finish_and_clear();

    report(&result, args.validate, args.show_warnings);

    let output = format_receipt(&result.receipt, args.format)?;
    write_output(args.output.as_deref(), &output)?;

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
