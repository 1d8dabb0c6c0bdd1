//! Error types for the rcpt-core library.
//!
//! Receipt text extraction itself never fails: every stage falls back to an
//! empty or default value. Errors only come from the OCR provider call and from
//! configuration handling around it.

use thiserror::Error;

/// Main error type for the rcpt library.
#[derive(Error, Debug)]
pub enum RcptError {
    /// OCR provider error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be (de)serialized.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for RcptError {
    fn from(err: serde_json::Error) -> Self {
        RcptError::Config(err.to_string())
    }
}

/// Errors raised by an OCR text provider.
#[derive(Error, Debug)]
pub enum OcrError {
    /// No credentials were available for the provider.
    #[error("missing OCR credentials: {0} is not set")]
    MissingCredentials(String),

    /// The provider answered with an error payload.
    #[error("OCR provider error: {0}")]
    Provider(String),

    /// Transport-level failure talking to the provider.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The image could not be sent (empty or unreadable).
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

#[cfg(feature = "vision")]
impl From<reqwest::Error> for OcrError {
    fn from(err: reqwest::Error) -> Self {
        OcrError::Http(err.without_url().to_string())
    }
}

/// Result type for the rcpt library.
pub type Result<T> = std::result::Result<T, RcptError>;
