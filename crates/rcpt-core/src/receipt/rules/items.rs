//! Line item classification and item/price matching.
//!
//! OCR regularly splits one printed receipt row into two lines: the item name
//! on one, its price on the next (or a few lines later). The matcher walks the
//! lines once, keeping a pool of unpriced item lines and binding each
//! standalone price to the nearest preceding unmatched item. Discounts attach
//! to the nearest item already resolved a few lines above them.

use rust_decimal::Decimal;
use tracing::{debug, trace};

use super::amounts::{PriceBounds, parse_amount, parse_discount_amount};
use super::patterns::{
    DISCOUNT, ITEM_ONLY, ITEM_WITH_PRICE, LEADING_CODE, MONEY, PRICE_ONLY, SECTION_BOUNDARIES,
    TAX_MARKER, TRAILING_CODE, WHITESPACE,
};
use crate::models::receipt::ResolvedItem;
use crate::receipt::lines::RawLine;

/// Shape of a single receipt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Subtotal/tax/tender banners and other noise that ends an item block.
    Boundary(&'static str),
    /// Item code, name and price on one line.
    ItemWithPrice {
        item_number: Option<String>,
        name: String,
        price: Decimal,
    },
    /// A price on its own.
    PriceOnly(Decimal),
    /// A trailing-minus discount amount.
    Discount(Decimal),
    /// Item code and name without a price.
    ItemOnly {
        item_number: Option<String>,
        name: String,
    },
    Other,
}

/// Classifies lines by shape, in fixed precedence order.
#[derive(Debug, Clone, Default)]
pub struct LineClassifier {
    bounds: PriceBounds,
}

impl LineClassifier {
    pub fn new(bounds: PriceBounds) -> Self {
        Self { bounds }
    }

    pub fn classify(&self, line: &str) -> LineKind {
        if let Some(reason) = boundary_reason(line) {
            return LineKind::Boundary(reason);
        }

        if let Some(kind) = self.item_with_price(line) {
            return kind;
        }

        if let Some(caps) = PRICE_ONLY.captures(line) {
            if let Some(price) = self.bounds.accept(parse_amount(&caps[1])) {
                return LineKind::PriceOnly(price);
            }
        }

        if let Some(caps) = DISCOUNT.captures(line) {
            if let Some(amount) = self.bounds.accept(parse_discount_amount(&caps[1])) {
                return LineKind::Discount(amount);
            }
        }

        if !MONEY.is_match(line) {
            if let Some(caps) = ITEM_ONLY.captures(line) {
                if let Some((item_number, name)) = name_and_code(caps.get(1).map(|m| m.as_str()), &caps[2]) {
                    return LineKind::ItemOnly { item_number, name };
                }
            }
        }

        LineKind::Other
    }

    fn item_with_price(&self, line: &str) -> Option<LineKind> {
        let caps = ITEM_WITH_PRICE.captures(line)?;
        let price = self.bounds.accept(parse_amount(&caps[3]))?;
        let (item_number, name) = name_and_code(caps.get(1).map(|m| m.as_str()), &caps[2])?;

        Some(LineKind::ItemWithPrice {
            item_number,
            name,
            price,
        })
    }
}

fn boundary_reason(line: &str) -> Option<&'static str> {
    SECTION_BOUNDARIES
        .iter()
        .find(|(pattern, _)| pattern.is_match(line))
        .map(|(_, reason)| *reason)
}

/// Split a trailing UPC off the raw name. A leading code takes precedence as
/// the item number.
fn name_and_code(leading: Option<&str>, raw: &str) -> Option<(Option<String>, String)> {
    let (raw, trailing) = match TRAILING_CODE.captures(raw.trim()) {
        Some(caps) => (
            caps.get(1).map_or("", |m| m.as_str()),
            caps.get(2).map(|m| m.as_str()),
        ),
        None => (raw, None),
    };

    let name = clean_name(raw)?;
    let item_number = leading.or(trailing).map(str::to_string);
    Some((item_number, name))
}

/// Normalize an item name. Names shorter than two characters are rejected.
pub fn clean_name(raw: &str) -> Option<String> {
    let name = TAX_MARKER.replace(raw.trim(), "");
    let name = LEADING_CODE.replace(&name, "");
    let name = WHITESPACE.replace_all(name.trim(), " ").into_owned();

    if name.chars().count() < 2 {
        None
    } else {
        Some(name)
    }
}

/// An item line still waiting for its price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateItem {
    pub item_number: Option<String>,
    pub name: String,
    pub order: usize,
    pub matched: bool,
}

/// Single-pass item/price/discount state machine.
#[derive(Debug)]
pub struct ItemMatcher {
    classifier: LineClassifier,
    discount_window: usize,
    candidates: Vec<CandidateItem>,
    items: Vec<ResolvedItem>,
}

impl ItemMatcher {
    pub fn new(bounds: PriceBounds, discount_window: usize) -> Self {
        Self {
            classifier: LineClassifier::new(bounds),
            discount_window,
            candidates: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Process the next line. Lines must be fed in ascending `order`.
    pub fn feed(&mut self, line: &RawLine) {
        match self.classifier.classify(&line.text) {
            LineKind::Boundary(reason) => {
                if !self.candidates.is_empty() {
                    trace!(
                        "Line {} is a {} boundary, dropping {} candidates",
                        line.order,
                        reason,
                        self.candidates.len()
                    );
                }
                self.candidates.clear();
            }
            LineKind::ItemWithPrice {
                item_number,
                name,
                price,
            } => {
                trace!("Line {}: {} @ {}", line.order, name, price);
                self.items
                    .push(ResolvedItem::new(item_number, name, price, line.order));
            }
            LineKind::PriceOnly(price) => self.bind_price(price, line.order),
            LineKind::Discount(amount) => self.apply_discount(amount, line.order),
            LineKind::ItemOnly { item_number, name } => {
                self.candidates.push(CandidateItem {
                    item_number,
                    name,
                    order: line.order,
                    matched: false,
                });
            }
            LineKind::Other => {}
        }
    }

    fn bind_price(&mut self, price: Decimal, order: usize) {
        let nearest = self
            .candidates
            .iter_mut()
            .filter(|c| !c.matched && c.order <= order)
            .min_by_key(|c| order - c.order);

        match nearest {
            Some(candidate) => {
                candidate.matched = true;
                trace!(
                    "Price {} on line {} bound to '{}' on line {}",
                    price, order, candidate.name, candidate.order
                );
                self.items.push(ResolvedItem::new(
                    candidate.item_number.clone(),
                    candidate.name.clone(),
                    price,
                    candidate.order,
                ));
            }
            None => debug!("Dropping unattributed price {} on line {}", price, order),
        }
    }

    fn apply_discount(&mut self, amount: Decimal, order: usize) {
        let window = self.discount_window;
        let target = self
            .items
            .iter_mut()
            .filter_map(|item| {
                let distance = order.checked_sub(item.order)?;
                (distance > 0 && distance <= window).then_some((distance, item))
            })
            .min_by_key(|(distance, _)| *distance);

        match target {
            Some((_, item)) => {
                trace!("Discount {} on line {} applied to '{}'", amount, order, item.name);
                item.apply_discount(amount);
            }
            None => debug!("Dropping discount {} on line {}: no item within {} lines", amount, order, window),
        }
    }

    /// Candidates still waiting for a price.
    pub fn pending(&self) -> impl Iterator<Item = &CandidateItem> {
        self.candidates.iter().filter(|c| !c.matched)
    }

    /// Resolved items in emission order.
    pub fn finish(self) -> Vec<ResolvedItem> {
        self.items
    }
}

/// Run the matcher over every line.
pub fn match_items(lines: &[RawLine], bounds: PriceBounds, discount_window: usize) -> Vec<ResolvedItem> {
    let mut matcher = ItemMatcher::new(bounds, discount_window);
    for line in lines {
        matcher.feed(line);
    }
    matcher.finish()
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

    fn run(text: &str) -> Vec<ResolvedItem> {
        match_items(&normalize_lines(text), PriceBounds::default(), 3)
    }

    fn names(items: &[ResolvedItem]) -> Vec<(&str, Decimal, usize)> {
        items
            .iter()
            .map(|i| (i.name.as_str(), i.total_price, i.order))
            .collect()
    }

    #[test]
    fn test_classify_shapes() {
        let c = LineClassifier::default();

        assert_eq!(c.classify("SUBTOTAL"), LineKind::Boundary("subtotal"));
        assert_eq!(c.classify("VISA TEND 12.40"), LineKind::Boundary("tender"));
        assert_eq!(
            c.classify("654321 MILK 4.50"),
            LineKind::ItemWithPrice {
                item_number: Some("654321".to_string()),
                name: "MILK".to_string(),
                price: dec("4.50"),
            }
        );
        assert_eq!(c.classify("2.99"), LineKind::PriceOnly(dec("2.99")));
        assert_eq!(c.classify("2.99 N"), LineKind::PriceOnly(dec("2.99")));
        assert_eq!(c.classify("1.00-"), LineKind::Discount(dec("1.00")));
        assert_eq!(c.classify("/1234567 150-"), LineKind::Discount(dec("1.50")));
        assert_eq!(
            c.classify("123456 BANANAS"),
            LineKind::ItemOnly {
                item_number: Some("123456".to_string()),
                name: "BANANAS".to_string(),
            }
        );
        assert_eq!(c.classify("03/09/2024 14:22"), LineKind::Other);
    }

    #[test]
    fn test_tax_marker_and_spacing_cleanup() {
        let c = LineClassifier::default();
        assert_eq!(
            c.classify("E 1234   KS   WATER 4.99 A"),
            LineKind::ItemWithPrice {
                item_number: Some("1234".to_string()),
                name: "KS WATER".to_string(),
                price: dec("4.99"),
            }
        );
    }

    #[test]
    fn test_trailing_upc_becomes_item_number() {
        let c = LineClassifier::default();
        assert_eq!(
            c.classify("GV 2% MILK 007874235186 F 3.48 N"),
            LineKind::ItemWithPrice {
                item_number: Some("007874235186".to_string()),
                name: "GV 2% MILK".to_string(),
                price: dec("3.48"),
            }
        );
        assert_eq!(
            c.classify("YOPLAIT 007047000312"),
            LineKind::ItemOnly {
                item_number: Some("007047000312".to_string()),
                name: "YOPLAIT".to_string(),
            }
        );
        assert_eq!(
            c.classify("4011 VITAMIN C 12345678"),
            LineKind::ItemOnly {
                item_number: Some("4011".to_string()),
                name: "VITAMIN C".to_string(),
            }
        );
    }

    #[test]
    fn test_short_names_rejected() {
        assert_eq!(clean_name("E 12 X"), None);
        assert_eq!(clean_name("  2   PACK  "), Some("PACK".to_string()));
        assert_eq!(LineClassifier::default().classify("Q 1.99"), LineKind::Other);
    }

    #[test]
    fn test_price_binds_to_nearest_candidate() {
        let lines = vec![
            RawLine { text: "03/01/2024".to_string(), order: 0 },
            RawLine { text: "1.00-".to_string(), order: 1 },
            RawLine { text: "111 APPLES".to_string(), order: 2 },
            RawLine { text: "03/09/2024".to_string(), order: 3 },
            RawLine { text: "04/09/2024".to_string(), order: 4 },
            RawLine { text: "222 PEARS".to_string(), order: 5 },
            RawLine { text: "3.49".to_string(), order: 6 },
        ];

        let items = match_items(&lines, PriceBounds::default(), 3);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "PEARS");
        assert_eq!(items[0].order, 5);
        assert_eq!(items[0].unit_price, dec("3.49"));
    }

    #[test]
    fn test_matched_candidate_not_reused() {
        let items = run("111 APPLES\n222 PEARS\n3.49\n1.29");
        assert_eq!(
            names(&items),
            vec![("PEARS", dec("3.49"), 1), ("APPLES", dec("1.29"), 0)]
        );
    }

    #[test]
    fn test_boundary_discards_candidates() {
        let items = run("999 SOAP\n123 BREAD\nSUBTOTAL\n2.49");
        assert!(items.is_empty());
    }

    #[test]
    fn test_unattributed_price_dropped() {
        assert!(run("2.99\n3.99").is_empty());
    }

    #[test]
    fn test_out_of_range_prices_never_bind() {
        let items = run("111 TV\n15000.00\n0.00\n222 CHAIR 0.00");
        assert!(items.is_empty());
    }

    #[test]
    fn test_discount_applies_within_window() {
        let items = run("111 COFFEE 9.99\n/111 2.00-\n222 TEA\n3.50\n50-");
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].discount, dec("2.00"));
        assert_eq!(items[0].total_price, dec("7.99"));

        assert_eq!(items[1].name, "TEA");
        assert_eq!(items[1].discount, dec("0.50"));
        assert_eq!(items[1].total_price, dec("3.00"));
        assert!(items.iter().all(ResolvedItem::is_consistent));
    }

    #[test]
    fn test_discount_outside_window_dropped() {
        let items = run("111 COFFEE 9.99\nA\nB\nC\n2.00-");
        assert_eq!(items[0].discount, Decimal::ZERO);
        assert_eq!(items[0].total_price, dec("9.99"));
    }

    #[test]
    fn test_pending_candidates() {
        let mut matcher = ItemMatcher::new(PriceBounds::default(), 3);
        for line in normalize_lines("111 APPLES\n222 PEARS\n1.00") {
            matcher.feed(&line);
        }

        let pending: Vec<&str> = matcher.pending().map(|c| c.name.as_str()).collect();
        assert_eq!(pending, vec!["APPLES"]);
    }
}
