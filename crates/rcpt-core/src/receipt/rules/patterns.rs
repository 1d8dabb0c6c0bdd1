//! Common regex patterns and lookup tables for receipt extraction.
//!
//! Tables are ordered and evaluated top to bottom; the first entry that
//! matches wins. Adding a merchant or a noise banner means adding a row here.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Known merchants: (pattern, canonical name)
    pub static ref MERCHANTS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"(?i)\bWAL[\s\-*]?MART\b").unwrap(), "Walmart"),
        (Regex::new(r"(?i)\bSAM'?S\s+CLUB\b").unwrap(), "Sam's Club"),
        (Regex::new(r"(?i)\bCOSTCO\b").unwrap(), "Costco"),
        (Regex::new(r"(?i)\bTARGET\b").unwrap(), "Target"),
        (Regex::new(r"(?i)\bKROGER\b").unwrap(), "Kroger"),
        (Regex::new(r"(?i)\bSAFEWAY\b").unwrap(), "Safeway"),
        (Regex::new(r"(?i)\bWHOLE\s+FOODS\b").unwrap(), "Whole Foods"),
        (Regex::new(r"(?i)\bTRADER\s+JOE'?S\b").unwrap(), "Trader Joe's"),
        (Regex::new(r"(?i)\bALDI\b").unwrap(), "Aldi"),
        (Regex::new(r"(?i)\bPUBLIX\b").unwrap(), "Publix"),
        (Regex::new(r"(?i)\bH-?E-?B\b").unwrap(), "H-E-B"),
        (Regex::new(r"(?i)\bMEIJER\b").unwrap(), "Meijer"),
        (Regex::new(r"(?i)\bWEGMANS\b").unwrap(), "Wegmans"),
        (Regex::new(r"(?i)\bALBERTSONS\b").unwrap(), "Albertsons"),
        (Regex::new(r"(?i)\bFOOD\s+LION\b").unwrap(), "Food Lion"),
        (Regex::new(r"(?i)\bSTOP\s*&\s*SHOP\b").unwrap(), "Stop & Shop"),
        (Regex::new(r"(?i)\bWALGREENS\b").unwrap(), "Walgreens"),
        (Regex::new(r"(?i)\bCVS\b").unwrap(), "CVS"),
        (Regex::new(r"(?i)\bHOME\s+DEPOT\b").unwrap(), "The Home Depot"),
        (Regex::new(r"(?i)\bLOWE'?S\b").unwrap(), "Lowe's"),
        (Regex::new(r"(?i)\bBEST\s+BUY\b").unwrap(), "Best Buy"),
        (Regex::new(r"(?i)\bDOLLAR\s+GENERAL\b").unwrap(), "Dollar General"),
        (Regex::new(r"(?i)\b7-?ELEVEN\b").unwrap(), "7-Eleven"),
    ];

    // Postal address shapes
    pub static ref STREET_LINE: Regex = Regex::new(
        r"(?i)^\d{1,6}\s+(?:[NSEW]\.?\s+)?[A-Za-z0-9.' ]*?\b(?:ST|STREET|AVE|AVENUE|RD|ROAD|BLVD|BOULEVARD|DR|DRIVE|LN|LANE|WAY|HWY|HIGHWAY|PKWY|PARKWAY|PL|PLACE|CT|COURT|CIR|CIRCLE|TRL|TRAIL|PIKE|TPKE|SQ|PLAZA)\b\.?(?:\s.*)?$"
    ).unwrap();

    pub static ref CITY_STATE_ZIP: Regex = Regex::new(
        r"^([A-Za-z][A-Za-z .'\-]*?),?\s+([A-Z]{2})\s+(\d{5})(?:-\d{4})?$"
    ).unwrap();

    pub static ref CITY_STATE: Regex = Regex::new(
        r"^([A-Za-z][A-Za-z .'\-]*?),\s*([A-Z]{2})$"
    ).unwrap();

    pub static ref ZIP_ONLY: Regex = Regex::new(
        r"^(\d{5})(?:-\d{4})?$"
    ).unwrap();

    // US date: month/day/year
    pub static ref DATE_MDY: Regex = Regex::new(
        r"\b(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})\b"
    ).unwrap();

    // Amount patterns (US format: 1,234.56)
    pub static ref MONEY: Regex = Regex::new(
        r"\$?\s?(\d[\d,]*\.\d{2})\b"
    ).unwrap();

    // Line shapes
    pub static ref ITEM_WITH_PRICE: Regex = Regex::new(
        r"^(?:[A-Z]\s+)?(?:(\d{3,})\s+)?(.*?[A-Za-z].*?)\s+\$?(\d[\d,]*\.\d{2})(?:\s*[A-Z]{1,2})?$"
    ).unwrap();

    pub static ref PRICE_ONLY: Regex = Regex::new(
        r"^\$?\s?(\d[\d,]*\.\d{2})(?:\s*[A-Z])?$"
    ).unwrap();

    pub static ref DISCOUNT: Regex = Regex::new(
        r"^(?:.*\s)?\$?(\d[\d,]*(?:\.\d{2})?)-(?:\s*[A-Z])?$"
    ).unwrap();

    pub static ref ITEM_ONLY: Regex = Regex::new(
        r"^(?:[A-Z]\s+)?(?:(\d{3,})\s+)?([A-Za-z].*)$"
    ).unwrap();

    // Item name cleanup
    pub static ref TAX_MARKER: Regex = Regex::new(r"^[A-Z]\s+").unwrap();
    pub static ref LEADING_CODE: Regex = Regex::new(r"^\d+\s+").unwrap();
    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // Walmart-style UPC printed after the name, optionally followed by a flag letter
    pub static ref TRAILING_CODE: Regex = Regex::new(
        r"^(.*?[A-Za-z].*?)\s+(\d{8,14})(?:\s+[A-Z])?$"
    ).unwrap();

    // Totals
    pub static ref TOTAL_MARKER: Regex = Regex::new(
        r"(?i)^[^A-Za-z0-9]*(?:GRAND\s+|ORDER\s+|SALE\s+)?TOTAL\b"
    ).unwrap();

    pub static ref TOTAL_MARKER_EXCLUDE: Regex = Regex::new(
        r"(?i)\b(?:SAVINGS|SAVED|ITEMS|QTY|NUMBER|DISCOUNTS?)\b"
    ).unwrap();

    pub static ref TOTAL_INLINE: Regex = Regex::new(
        r"(?i)\bTOTAL\b[\s:]*\$?\s*(\d[\d,]*\.\d{2})\b"
    ).unwrap();

    // Section boundaries and noise: (pattern, reason)
    pub static ref SECTION_BOUNDARIES: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"(?i)\bSUB\s*-?\s*TOTAL\b").unwrap(), "subtotal"),
        (Regex::new(r"(?i)^[^A-Za-z0-9]*(?:GRAND\s+|ORDER\s+|SALE\s+)?TOTAL\b").unwrap(), "total"),
        (Regex::new(r"(?i)\b(?:SALES\s+)?TAX\b").unwrap(), "tax"),
        (Regex::new(r"(?i)\b(?:BALANCE|AMOUNT)(?:\s+DUE)?\b").unwrap(), "balance"),
        (Regex::new(r"(?i)\bCHANGE(?:\s+DUE)?\b").unwrap(), "change"),
        (Regex::new(r"(?i)\b(?:CASH|TEND(?:ER(?:ED)?)?|PAYMENT|PAID)\b").unwrap(), "tender"),
        (Regex::new(r"(?i)\b(?:VISA|MASTER\s*CARD|AMEX|AMERICAN\s+EXPRESS|DISCOVER|DEBIT|CREDIT|EBT)\b").unwrap(), "card"),
        (Regex::new(r"(?i)\b(?:APPROVED|APPROVAL|AUTH(?:ORIZATION)?(?:\s*CODE)?|REF(?:ERENCE)?\s*(?:#|NO)|TRANS(?:ACTION)?\s*(?:ID|#))").unwrap(), "card authorization"),
        (Regex::new(r"(?i)\bMEMBER(?:SHIP)?\b|\bACCOUNT\s*(?:#|NO)|\bACCT\b").unwrap(), "membership"),
        (Regex::new(r"(?i)\b(?:ST|OP|TE|TR)\s*#").unwrap(), "register"),
        (Regex::new(r"(?i)\bITEMS?\s+SOLD\b|\bNUMBER\s+OF\s+ITEMS\b").unwrap(), "item count"),
        (Regex::new(r"(?i)\bYOU\s+SAVED\b").unwrap(), "savings"),
        (Regex::new(r"(?i)\bTHANK\s+YOU\b").unwrap(), "closing"),
        (Regex::new(r"^[\d\s*#xX\-]{10,}$").unwrap(), "numeric run"),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_marker_ignores_subtotal() {
        assert!(TOTAL_MARKER.is_match("TOTAL"));
        assert!(TOTAL_MARKER.is_match("**** TOTAL 12.40"));
        assert!(!TOTAL_MARKER.is_match("SUBTOTAL"));
        assert!(!TOTAL_INLINE.is_match("SUBTOTAL 7.49"));
    }

    #[test]
    fn test_money_rejects_overlong_fraction() {
        assert!(MONEY.is_match("4.50"));
        assert!(MONEY.is_match("$1,204.99"));
        assert!(!MONEY.is_match("12.345"));
    }

    #[test]
    fn test_numeric_run_boundary() {
        let run = &SECTION_BOUNDARIES.last().unwrap().0;
        assert!(run.is_match("************4821"));
        assert!(run.is_match("1234 5678 9012"));
        assert!(!run.is_match("123456"));
    }
}
