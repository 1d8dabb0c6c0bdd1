//! OCR provider boundary.
//!
//! Text recognition is delegated to an external service. The engine only ever
//! sees the returned text; a failed provider call degrades to the empty-text
//! receipt instead of surfacing as an error.

#[cfg(feature = "vision")]
mod vision;

#[cfg(feature = "vision")]
pub use vision::VisionClient;

use std::future::Future;

use tracing::{debug, warn};

use crate::error::OcrError;
use crate::receipt::{ExtractionResult, ReceiptParser};

/// A service that turns an image into text.
pub trait TextExtractor {
    /// Best single text annotation for the image, or empty text when nothing
    /// was recognized.
    fn extract_text(&self, image: &[u8]) -> impl Future<Output = Result<String, OcrError>> + Send;
}

/// Run OCR on an image and parse the result.
///
/// OCR failures are logged and reported as a warning on an otherwise empty
/// receipt.
pub async fn scan_receipt<E, P>(extractor: &E, parser: &P, image: &[u8]) -> ExtractionResult
where
    E: TextExtractor,
    P: ReceiptParser,
{
    match extractor.extract_text(image).await {
        Ok(text) => {
            debug!("OCR returned {} characters", text.len());
            parser.parse(&text)
        }
        Err(err) => {
            warn!("OCR failed, returning empty receipt: {}", err);
            let mut result = parser.parse("");
            result.warnings.insert(0, format!("OCR failed: {}", err));
            result
        }
    }
}
