//! Parse command - extract receipt data from OCR text.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use rcpt_core::models::receipt::ParsedReceipt;
use rcpt_core::receipt::rules::format_amount;
use rcpt_core::receipt::{ExtractionResult, HeuristicReceiptParser, ReceiptParser};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input text file, or `-` for stdin
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

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per item
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension used when writing this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let text = read_input(&args.input)?;
    info!("Parsing {} bytes of receipt text", text.len());

    let parser = HeuristicReceiptParser::from_config(&config.extraction);
    let result = parser.parse(&text);

    report(&result, args.validate, args.show_warnings);

    let output = format_receipt(&result.receipt, args.format)?;
    write_output(args.output.as_deref(), &output)?;

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(fs::read_to_string(input)?)
}

/// Print warnings and validation issues to stderr.
pub fn report(result: &ExtractionResult, validate: bool, show_warnings: bool) {
    if show_warnings {
        for warning in &result.warnings {
            eprintln!("{} {}", style("⚠").yellow(), warning);
        }
    }

    if validate {
        let issues = result.receipt.validate();
        if issues.is_empty() {
            eprintln!("{} Receipt is consistent", style("✓").green());
        } else {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }
}

/// Write to a file, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, output: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, output)?;
            eprintln!("{} Output written to {}", style("✓").green(), path.display());
        }
        None => println!("{}", output),
    }
    Ok(())
}

pub fn format_receipt(receipt: &ParsedReceipt, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(receipt)?),
        OutputFormat::Csv => format_csv(receipt),
        OutputFormat::Text => Ok(format_text(receipt)),
    }
}

fn format_csv(receipt: &ParsedReceipt) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "store_name",
        "purchase_date",
        "item_number",
        "name",
        "quantity",
        "unit_price",
        "discount",
        "total_price",
    ])?;

    let date = receipt.purchase_date.to_string();
    for item in &receipt.items {
        wtr.write_record([
            receipt.store_name.as_str(),
            date.as_str(),
            item.item_number.as_deref().unwrap_or(""),
            item.name.as_str(),
            &item.quantity.to_string(),
            &format_amount(item.unit_price),
            &format_amount(item.discount),
            &format_amount(item.total_price),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(receipt: &ParsedReceipt) -> String {
    let mut output = String::new();

    let store = if receipt.store_name.is_empty() {
        "(unknown)"
    } else {
        receipt.store_name.as_str()
    };
    output.push_str(&format!("Store: {}\n", store));

    let address = receipt.address();
    if !address.is_empty() {
        output.push_str(&format!("Address: {}\n", address));
    }
    output.push_str(&format!("Date: {}\n", receipt.purchase_date));
    output.push('\n');

    output.push_str("Items:\n");
    for item in &receipt.items {
        let mut line = format!(
            "  {:<32} {:>3} x {:>8} {:>9}",
            item.name,
            item.quantity,
            format_amount(item.unit_price),
            format_amount(item.total_price)
        );
        if !item.discount.is_zero() {
            line.push_str(&format!("  (-{})", format_amount(item.discount)));
        }
        output.push_str(&line);
        output.push('\n');
    }
    if receipt.items.is_empty() {
        output.push_str("  (none)\n");
    }
    output.push('\n');

    output.push_str(&format!("Total: {}\n", format_amount(receipt.total_amount)));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcpt_core::parse_receipt_text;

    #[test]
    fn test_csv_has_one_row_per_item() {
        let receipt = parse_receipt_text("123456 BANANAS\n2.99\n654321 MILK 4.50");
        let csv = format_receipt(&receipt, OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("store_name,purchase_date"));
        assert!(lines[1].ends_with("123456,BANANAS,1,2.99,0.00,2.99"));
    }

    #[test]
    fn test_text_summary() {
        let receipt = parse_receipt_text("TARGET\n111 SOCKS 7.00\nTOTAL 7.49");
        let text = format_receipt(&receipt, OutputFormat::Text).unwrap();

        assert!(text.contains("Store: Target"));
        assert!(text.contains("SOCKS"));
        assert!(text.contains("Total: 7.49"));
    }
}
