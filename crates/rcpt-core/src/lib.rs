//! Core library for retail receipt extraction.
//!
//! This crate provides:
//! - Line-shape heuristics turning noisy OCR text into a structured receipt
//! - Store, address, purchase date, line item and total extraction
//! - An OCR provider boundary with a Google Cloud Vision client

pub mod error;
pub mod models;
pub mod ocr;
pub mod receipt;

pub use error::{OcrError, RcptError, Result};
pub use models::config::RcptConfig;
pub use models::receipt::{ParsedReceipt, ResolvedItem};
pub use ocr::{TextExtractor, scan_receipt};
#[cfg(feature = "vision")]
pub use ocr::VisionClient;
pub use receipt::{ExtractionResult, HeuristicReceiptParser, ReceiptParser, parse_receipt_text};
