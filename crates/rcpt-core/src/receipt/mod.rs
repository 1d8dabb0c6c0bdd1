//! Receipt text extraction.

pub mod lines;
mod parser;
pub mod rules;

pub use lines::{RawLine, normalize_lines};
pub use parser::{ExtractionResult, HeuristicReceiptParser};

use crate::models::receipt::ParsedReceipt;

/// Trait for receipt text parsers.
///
/// Parsing never fails: undetected fields fall back to empty or default
/// values and are reported as warnings on the result.
pub trait ReceiptParser {
    /// Parse a receipt from OCR text.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Parse receipt text with the default heuristics.
pub fn parse_receipt_text(text: &str) -> ParsedReceipt {
    HeuristicReceiptParser::new().parse(text).receipt
}
