//! Rule-based extractors for retail receipts.

pub mod amounts;
pub mod dates;
pub mod items;
pub mod merge;
pub mod patterns;
pub mod store;
pub mod totals;

pub use amounts::{AmountExtractor, PriceBounds, format_amount, parse_amount, round2};
pub use dates::{DateExtractor, extract_purchase_date};
pub use items::{CandidateItem, ItemMatcher, LineClassifier, LineKind, match_items};
pub use merge::{merge_duplicates, merge_key};
pub use store::{StoreAddress, StoreExtractor, extract_address, identify_store};
pub use totals::{TotalResolver, TotalSource};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// Extract all occurrences of the field, in text order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
