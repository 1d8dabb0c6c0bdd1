//! Receipt total resolution.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::amounts::{AmountExtractor, PriceBounds, parse_amount, round2};
use super::patterns::{TOTAL_INLINE, TOTAL_MARKER, TOTAL_MARKER_EXCLUDE};
use super::FieldExtractor;
use crate::models::receipt::ResolvedItem;
use crate::receipt::lines::RawLine;

/// Where the resolved total came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalSource {
    /// Largest amount at or just after a TOTAL line.
    Marker,
    /// First inline `TOTAL $X.XX` token.
    Inline,
    /// Sum of resolved line items.
    ItemSum,
    /// Nothing found.
    None,
}

/// Resolves the printed receipt total.
#[derive(Debug, Clone)]
pub struct TotalResolver {
    lookahead: usize,
    bounds: PriceBounds,
}

impl TotalResolver {
    pub fn new(lookahead: usize, bounds: PriceBounds) -> Self {
        Self { lookahead, bounds }
    }

    pub fn resolve(&self, lines: &[RawLine], text: &str, items: &[ResolvedItem]) -> (Decimal, TotalSource) {
        if let Some(total) = self.after_marker(lines) {
            return (total, TotalSource::Marker);
        }

        if let Some(total) = self.inline(text) {
            return (total, TotalSource::Inline);
        }

        let sum = round2(items.iter().map(|i| i.total_price).sum());
        if sum > Decimal::ZERO {
            debug!("No printed total, using item sum {}", sum);
            return (sum, TotalSource::ItemSum);
        }

        (Decimal::ZERO, TotalSource::None)
    }

    /// Max amount on the first TOTAL line and the lines right after it.
    ///
    /// Subtotal, tax and total are usually printed together below the marker,
    /// so the largest nearby value is taken as the grand total.
    fn after_marker(&self, lines: &[RawLine]) -> Option<Decimal> {
        let marker = lines
            .iter()
            .position(|l| TOTAL_MARKER.is_match(&l.text) && !TOTAL_MARKER_EXCLUDE.is_match(&l.text))?;

        let extractor = AmountExtractor::new().with_bounds(self.bounds);
        let total = lines
            .iter()
            .skip(marker)
            .take(self.lookahead + 1)
            .flat_map(|l| extractor.extract_all(&l.text))
            .map(|m| m.value)
            .max();

        if let Some(total) = total {
            debug!("Total {} found near marker on line {}", total, lines[marker].order);
        }
        total
    }

    fn inline(&self, text: &str) -> Option<Decimal> {
        TOTAL_INLINE
            .captures_iter(text)
            .filter(|caps| {
                let before = text[..caps.get(0).unwrap().start()].trim_end();
                !before.to_uppercase().ends_with("SUB")
            })
            .find_map(|caps| self.bounds.accept(parse_amount(&caps[1])))
    }
}

impl Default for TotalResolver {
    fn default() -> Self {
        Self::new(15, PriceBounds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::lines::normalize_lines;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn resolve(text: &str, items: &[ResolvedItem]) -> (Decimal, TotalSource) {
        TotalResolver::default().resolve(&normalize_lines(text), text, items)
    }

    #[test]
    fn test_max_after_marker() {
        let text = "MILK 4.50\nTOTAL\n11.80\n0.60\n12.40\nVISA 12.40";
        assert_eq!(resolve(text, &[]), (dec("12.40"), TotalSource::Marker));
    }

    #[test]
    fn test_marker_line_value_counts() {
        let text = "SUBTOTAL 9.00\nTAX 0.72\n**** TOTAL 9.72";
        assert_eq!(resolve(text, &[]), (dec("9.72"), TotalSource::Marker));
    }

    #[test]
    fn test_lookahead_limit() {
        let mut text = String::from("TOTAL\n");
        for _ in 0..15 {
            text.push_str("THANK YOU\n");
        }
        text.push_str("99.99\n");

        let resolver = TotalResolver::default();
        let lines = normalize_lines(&text);
        assert_eq!(resolver.resolve(&lines, &text, &[]), (Decimal::ZERO, TotalSource::None));
    }

    #[test]
    fn test_inline_total_skips_sub_total() {
        let resolver = TotalResolver::default();
        let text = "SUB TOTAL 8.00 TAX 0.64 TOTAL $8.64";
        assert_eq!(resolver.inline(text), Some(dec("8.64")));
    }

    #[test]
    fn test_item_sum_fallback() {
        let items = vec![
            ResolvedItem::new(None, "BANANAS", dec("2.99"), 0),
            ResolvedItem::new(None, "MILK", dec("4.50"), 2),
        ];
        assert_eq!(
            resolve("SUBTOTAL\n7.49", &items),
            (dec("7.49"), TotalSource::ItemSum)
        );
    }

    #[test]
    fn test_nothing_found() {
        assert_eq!(resolve("", &[]), (Decimal::ZERO, TotalSource::None));
    }
}
