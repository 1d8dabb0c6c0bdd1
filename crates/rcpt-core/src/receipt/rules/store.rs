//! Store name and postal address identification.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::trace;

use super::FieldExtractor;
use super::patterns::{CITY_STATE, CITY_STATE_ZIP, MERCHANTS, STREET_LINE, ZIP_ONLY};
use crate::receipt::lines::RawLine;

/// Address fragments found near the top of a receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreAddress {
    pub location: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

type AddressHandler = fn(&Captures, &mut StoreAddress);

lazy_static! {
    static ref ADDRESS_SHAPES: Vec<(&'static Regex, AddressHandler)> = vec![
        (&*STREET_LINE, street as AddressHandler),
        (&*CITY_STATE_ZIP, city_state_zip as AddressHandler),
        (&*CITY_STATE, city_state as AddressHandler),
        (&*ZIP_ONLY, zip_only as AddressHandler),
    ];
}

fn fill(field: &mut String, value: &str) {
    if field.is_empty() {
        *field = value.trim().to_string();
    }
}

fn street(caps: &Captures, address: &mut StoreAddress) {
    fill(&mut address.location, &caps[0]);
}

fn city_state_zip(caps: &Captures, address: &mut StoreAddress) {
    fill(&mut address.city, &caps[1]);
    fill(&mut address.state, &caps[2]);
    fill(&mut address.zip, &caps[3]);
}

fn city_state(caps: &Captures, address: &mut StoreAddress) {
    fill(&mut address.city, &caps[1]);
    fill(&mut address.state, &caps[2]);
}

fn zip_only(caps: &Captures, address: &mut StoreAddress) {
    fill(&mut address.zip, &caps[1]);
}

/// Merchant name extractor backed by the merchant table.
pub struct StoreExtractor;

impl StoreExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StoreExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for StoreExtractor {
    type Output = String;

    /// Every table merchant present in the text, in table order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        MERCHANTS
            .iter()
            .filter(|(pattern, _)| pattern.is_match(text))
            .map(|(_, name)| name.to_string())
            .collect()
    }
}

/// Canonical merchant name, or an empty string for unknown merchants.
pub fn identify_store(text: &str) -> String {
    StoreExtractor::new().extract(text).unwrap_or_default()
}

/// Scan the first `scan_lines` lines for address fragments.
pub fn extract_address(lines: &[RawLine], scan_lines: usize) -> StoreAddress {
    let mut address = StoreAddress::default();

    for line in lines.iter().take(scan_lines) {
        for (pattern, handler) in ADDRESS_SHAPES.iter() {
            if let Some(caps) = pattern.captures(&line.text) {
                trace!("Address fragment on line {}: {}", line.order, line.text);
                handler(&caps, &mut address);
            }
        }
    }

    address
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::lines::normalize_lines;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identify_store() {
        assert_eq!(identify_store("Walmart >\nSave money. Live better."), "Walmart");
        assert_eq!(identify_store("WAL*MART SUPERCENTER"), "Walmart");
        assert_eq!(identify_store("TRADER JOES #552"), "Trader Joe's");
        assert_eq!(identify_store("CORNER BODEGA"), "");
    }

    #[test]
    fn test_first_table_entry_wins() {
        // Costco sits above Target in the table
        assert_eq!(identify_store("TARGET GIFT CARD\nCOSTCO WHOLESALE"), "Costco");
    }

    #[test]
    fn test_extract_full_address() {
        let lines = normalize_lines(
            "COSTCO WHOLESALE\n1200 N MAIN ST\nSPRINGFIELD, IL 62701\n03/09/2024",
        );
        let address = extract_address(&lines, 15);

        assert_eq!(
            address,
            StoreAddress {
                location: "1200 N MAIN ST".to_string(),
                city: "SPRINGFIELD".to_string(),
                state: "IL".to_string(),
                zip: "62701".to_string(),
            }
        );
    }

    #[test]
    fn test_city_state_then_zip() {
        let lines = normalize_lines("TARGET\n455 ELM AVENUE\nDES MOINES, IA\n50309-1234");
        let address = extract_address(&lines, 15);

        assert_eq!(address.location, "455 ELM AVENUE");
        assert_eq!(address.city, "DES MOINES");
        assert_eq!(address.state, "IA");
        assert_eq!(address.zip, "50309");
    }

    #[test]
    fn test_address_outside_scan_window() {
        let lines = normalize_lines("A\nB\nC\n900 OAK RD");
        assert_eq!(extract_address(&lines, 3), StoreAddress::default());
        assert_eq!(extract_address(&lines, 4).location, "900 OAK RD");
    }
}
