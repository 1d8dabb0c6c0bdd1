//! Monetary amount parsing for US receipts.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use super::patterns::MONEY;
use super::{ExtractionMatch, FieldExtractor};

/// Round to cents, halves away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount with exactly two decimals (e.g. `4.50`).
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = round2(value);
    rounded.rescale(2);
    rounded.to_string()
}

/// Parse a US-formatted amount (`$1,234.56`, `4.50`).
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

/// Parse a discount amount. Values printed without a decimal point are cents.
pub fn parse_discount_amount(s: &str) -> Option<Decimal> {
    let value = parse_amount(s)?;
    if s.contains('.') {
        Some(value)
    } else {
        Some(value / Decimal::ONE_HUNDRED)
    }
}

/// Acceptance range for prices: `min <= value < max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBounds {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceBounds {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value < self.max
    }

    /// Keep a parsed value only when it falls inside the bounds.
    pub fn accept(&self, value: Option<Decimal>) -> Option<Decimal> {
        value.filter(|v| self.contains(*v))
    }
}

impl Default for PriceBounds {
    fn default() -> Self {
        Self {
            min: Decimal::new(1, 2),
            max: Decimal::new(10_000, 0),
        }
    }
}

/// Amount field extractor.
pub struct AmountExtractor {
    bounds: PriceBounds,
}

impl AmountExtractor {
    pub fn new() -> Self {
        Self {
            bounds: PriceBounds::default(),
        }
    }

    pub fn with_bounds(mut self, bounds: PriceBounds) -> Self {
        self.bounds = bounds;
        self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in MONEY.captures_iter(text) {
            let Some(amount) = self.bounds.accept(parse_amount(&caps[1])) else {
                continue;
            };

            let full_match = caps.get(0).unwrap();
            results.push(
                ExtractionMatch::new(amount, full_match.as_str())
                    .with_position(full_match.start(), full_match.end()),
            );
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("4.50"), Some(dec("4.50")));
        assert_eq!(parse_amount("$1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("$"), None);
    }

    #[test]
    fn test_discount_without_point_is_cents() {
        assert_eq!(parse_discount_amount("200"), Some(dec("2.00")));
        assert_eq!(parse_discount_amount("1.25"), Some(dec("1.25")));
    }

    #[test]
    fn test_round2_half_up() {
        assert_eq!(round2(dec("2.345")), dec("2.35"));
        assert_eq!(round2(dec("2.344")), dec("2.34"));
        assert_eq!(format_amount(dec("4.5")), "4.50");
    }

    #[test]
    fn test_bounds() {
        let bounds = PriceBounds::default();
        assert!(bounds.contains(dec("0.01")));
        assert!(bounds.contains(dec("9999.99")));
        assert!(!bounds.contains(dec("0.00")));
        assert!(!bounds.contains(dec("10000.00")));
        assert!(!bounds.contains(dec("15000.00")));
    }

    #[test]
    fn test_extract_all_amounts() {
        let extractor = AmountExtractor::new();
        let results = extractor.extract_all("TAX 0.52 TOTAL $12.40 CHANGE 0.00");

        let values: Vec<Decimal> = results.into_iter().map(|m| m.value).collect();
        assert_eq!(values, vec![dec("0.52"), dec("12.40")]);
    }
}
