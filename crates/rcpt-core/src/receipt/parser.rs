//! Heuristic receipt parser wiring the extraction stages together.

use std::time::Instant;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::receipt::ParsedReceipt;

use super::lines::normalize_lines;
use super::rules::{
    PriceBounds, TotalResolver, TotalSource, extract_address, extract_purchase_date,
    identify_store, match_items, merge_duplicates,
};
use super::ReceiptParser;

/// Result of receipt extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Extracted receipt data.
    pub receipt: ParsedReceipt,
    /// How the total was determined.
    pub total_source: TotalSource,
    /// Fields that could not be detected.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Line-shape heuristics for US retail receipts.
#[derive(Debug, Clone)]
pub struct HeuristicReceiptParser {
    /// Leading lines searched for the store address.
    address_scan_lines: usize,
    /// Discount look-back window in lines.
    discount_window: usize,
    /// Lines searched after a TOTAL marker.
    total_lookahead: usize,
    /// Accepted price range.
    bounds: PriceBounds,
    /// Whether repeated unit scans are folded.
    merge_duplicates: bool,
    /// Date used when none is printed; today when unset.
    reference_date: Option<NaiveDate>,
}

impl HeuristicReceiptParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            address_scan_lines: config.address_scan_lines,
            discount_window: config.discount_window,
            total_lookahead: config.total_lookahead,
            bounds: PriceBounds::new(config.min_price, config.max_price),
            merge_duplicates: config.merge_duplicates,
            reference_date: None,
        }
    }

    /// Set the discount look-back window.
    pub fn with_discount_window(mut self, lines: usize) -> Self {
        self.discount_window = lines;
        self
    }

    /// Set how many leading lines are searched for the address.
    pub fn with_address_scan_lines(mut self, lines: usize) -> Self {
        self.address_scan_lines = lines;
        self
    }

    /// Set how many lines after a TOTAL marker are searched.
    pub fn with_total_lookahead(mut self, lines: usize) -> Self {
        self.total_lookahead = lines;
        self
    }

    /// Enable or disable duplicate merging.
    pub fn with_merge_duplicates(mut self, merge: bool) -> Self {
        self.merge_duplicates = merge;
        self
    }

    /// Fix the fallback purchase date instead of using today.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

impl Default for HeuristicReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptParser for HeuristicReceiptParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing receipt from {} characters of text", text.len());

        let lines = normalize_lines(text);
        let mut receipt = ParsedReceipt::empty(text, self.today());

        if lines.is_empty() {
            warnings.push("Receipt text is empty".to_string());
            return ExtractionResult {
                receipt,
                total_source: TotalSource::None,
                warnings,
                processing_time_ms: start.elapsed().as_millis() as u64,
            };
        }

        // Store and address
        receipt.store_name = identify_store(text);
        if receipt.store_name.is_empty() {
            warnings.push("Could not identify store".to_string());
        }

        let address = extract_address(&lines, self.address_scan_lines);
        receipt.store_location = address.location;
        receipt.store_city = address.city;
        receipt.store_state = address.state;
        receipt.store_zip = address.zip;

        // Purchase date
        match extract_purchase_date(text) {
            Some(date) => receipt.purchase_date = date,
            None => warnings.push("Could not extract purchase date".to_string()),
        }

        // Line items
        let items = match_items(&lines, self.bounds, self.discount_window);
        debug!("Matched {} raw line items", items.len());
        receipt.items = if self.merge_duplicates {
            merge_duplicates(items)
        } else {
            items
                .into_iter()
                .filter(|i| i.unit_price > Decimal::ZERO)
                .collect()
        };
        if receipt.items.is_empty() {
            warnings.push("Could not extract line items".to_string());
        }

        // Total
        let resolver = TotalResolver::new(self.total_lookahead, self.bounds);
        let (total, total_source) = resolver.resolve(&lines, text, &receipt.items);
        receipt.total_amount = total;
        match total_source {
            TotalSource::ItemSum => warnings.push("No printed total, using sum of items".to_string()),
            TotalSource::None => warnings.push("Could not extract total".to_string()),
            _ => {}
        }

        debug!(
            "Extracted {} items totalling {} from '{}'",
            receipt.items.len(),
            receipt.total_amount,
            receipt.store_name
        );

        ExtractionResult {
            receipt,
            total_source,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}
