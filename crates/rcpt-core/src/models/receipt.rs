//! Receipt data models produced by the extraction engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::receipt::rules::amounts::round2;

/// A structured purchase record recovered from receipt text.
///
/// This is a plain value: persistence, manual corrections and category
/// assignment all happen on a separate downstream record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReceipt {
    /// Canonical merchant name, empty when the merchant is not recognized.
    pub store_name: String,

    /// Street line of the store address.
    pub store_location: String,

    /// City of the store address.
    pub store_city: String,

    /// Two-letter state code.
    pub store_state: String,

    /// Five-digit ZIP code.
    pub store_zip: String,

    /// Purchase date. Defaults to the day of parsing when no date was found.
    pub purchase_date: NaiveDate,

    /// Receipt total.
    pub total_amount: Decimal,

    /// Line items in receipt order.
    pub items: Vec<ResolvedItem>,

    /// Text the receipt was parsed from.
    pub raw_text: String,
}

/// A fully formed receipt line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedItem {
    /// Item code printed before the name (SKU, PLU, UPC).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_number: Option<String>,

    /// Item description.
    pub name: String,

    /// Price of a single unit.
    pub unit_price: Decimal,

    /// Number of units.
    pub quantity: u32,

    /// Accumulated discount for this line.
    pub discount: Decimal,

    /// `round2(unit_price * quantity - discount)`.
    pub total_price: Decimal,

    /// Position of the earliest receipt line this item came from.
    pub order: usize,
}

impl ResolvedItem {
    /// Create a single-unit item with no discount.
    pub fn new(item_number: Option<String>, name: impl Into<String>, unit_price: Decimal, order: usize) -> Self {
        Self {
            item_number,
            name: name.into(),
            unit_price,
            quantity: 1,
            discount: Decimal::ZERO,
            total_price: round2(unit_price),
            order,
        }
    }

    /// Add a discount and recompute the line total.
    pub fn apply_discount(&mut self, amount: Decimal) {
        self.discount += amount;
        self.recompute_total();
    }

    /// Recompute `total_price` from unit price, quantity and discount.
    pub fn recompute_total(&mut self) {
        self.total_price = round2(self.unit_price * Decimal::from(self.quantity) - self.discount);
    }

    /// Whether the stored total agrees with unit price, quantity and discount.
    pub fn is_consistent(&self) -> bool {
        self.total_price == round2(self.unit_price * Decimal::from(self.quantity) - self.discount)
    }
}

impl ParsedReceipt {
    /// Receipt with every field undetected.
    pub fn empty(raw_text: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            store_name: String::new(),
            store_location: String::new(),
            store_city: String::new(),
            store_state: String::new(),
            store_zip: String::new(),
            purchase_date: today,
            total_amount: Decimal::ZERO,
            items: Vec::new(),
            raw_text: raw_text.into(),
        }
    }

    /// Sum of line totals, rounded to cents.
    pub fn items_total(&self) -> Decimal {
        round2(self.items.iter().map(|i| i.total_price).sum())
    }

    /// Single-line address, skipping empty parts.
    pub fn address(&self) -> String {
        let mut parts = Vec::new();
        if !self.store_location.is_empty() {
            parts.push(self.store_location.clone());
        }

        let region = match (self.store_state.is_empty(), self.store_zip.is_empty()) {
            (false, false) => format!("{} {}", self.store_state, self.store_zip),
            (false, true) => self.store_state.clone(),
            (true, false) => self.store_zip.clone(),
            (true, true) => String::new(),
        };

        match (self.store_city.is_empty(), region.is_empty()) {
            (false, false) => parts.push(format!("{}, {}", self.store_city, region)),
            (false, true) => parts.push(self.store_city.clone()),
            (true, false) => parts.push(region),
            (true, true) => {}
        }

        parts.join(", ")
    }

    /// Validate the receipt data and return any issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.store_name.is_empty() {
            issues.push("Missing store name".to_string());
        }

        if self.items.is_empty() {
            issues.push("No line items".to_string());
        }

        if self.total_amount.is_zero() {
            issues.push("Total amount is zero".to_string());
        }

        for item in &self.items {
            if !item.is_consistent() {
                issues.push(format!(
                    "Item '{}' total ({}) does not match {} x {} - {}",
                    item.name, item.total_price, item.quantity, item.unit_price, item.discount
                ));
            }
        }

        let calculated = self.items_total();
        if !self.items.is_empty() && (calculated - self.total_amount).abs() > Decimal::new(1, 2) {
            issues.push(format!(
                "Line item total ({}) differs from receipt total ({})",
                calculated, self.total_amount
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_discount_recomputes_total() {
        let mut item = ResolvedItem::new(None, "EGGS", dec("5.49"), 0);
        item.apply_discount(dec("1.00"));
        assert_eq!(item.total_price, dec("4.49"));

        item.apply_discount(dec("0.50"));
        assert_eq!(item.discount, dec("1.50"));
        assert_eq!(item.total_price, dec("3.99"));
        assert!(item.is_consistent());
    }

    #[test]
    fn test_address_format() {
        let mut receipt = ParsedReceipt::empty("", today());
        receipt.store_location = "1200 MAIN ST".to_string();
        receipt.store_city = "SPRINGFIELD".to_string();
        receipt.store_state = "IL".to_string();
        receipt.store_zip = "62701".to_string();
        assert_eq!(receipt.address(), "1200 MAIN ST, SPRINGFIELD, IL 62701");

        receipt.store_zip.clear();
        receipt.store_location.clear();
        assert_eq!(receipt.address(), "SPRINGFIELD, IL");
    }

    #[test]
    fn test_validate_reports_mismatch() {
        let mut receipt = ParsedReceipt::empty("", today());
        receipt.store_name = "Target".to_string();
        receipt.items.push(ResolvedItem::new(None, "SOAP", dec("2.00"), 0));
        receipt.total_amount = dec("5.00");

        let issues = receipt.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("differs"));
    }

    #[test]
    fn test_validate_empty_receipt() {
        let issues = ParsedReceipt::empty("", today()).validate();
        assert_eq!(
            issues,
            vec![
                "Missing store name".to_string(),
                "No line items".to_string(),
                "Total amount is zero".to_string(),
            ]
        );
    }
}
