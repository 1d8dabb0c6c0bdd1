//! Purchase date extraction for US receipts.

use chrono::NaiveDate;

use super::patterns::DATE_MDY;
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor for `M/D/YY` and `M/D/YYYY` tokens.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in DATE_MDY.captures_iter(text) {
            let month: u32 = caps[1].parse().unwrap_or(0);
            let day: u32 = caps[2].parse().unwrap_or(0);
            let year = parse_year(&caps[3]);

            // 13/45/24 and friends are not dates
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                let full_match = caps.get(0).unwrap();
                results.push(
                    ExtractionMatch::new(date, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

/// First valid purchase date in the text.
pub fn extract_purchase_date(text: &str) -> Option<NaiveDate> {
    DateExtractor::new().extract(text).map(|m| m.value)
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if s.len() == 2 { 2000 + year } else { year }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_digit_year() {
        assert_eq!(
            extract_purchase_date("03/09/2024 14:22"),
            NaiveDate::from_ymd_opt(2024, 3, 9)
        );
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(
            extract_purchase_date("TR# 0042  1/5/99"),
            NaiveDate::from_ymd_opt(2099, 1, 5)
        );
    }

    #[test]
    fn test_skips_impossible_dates() {
        let text = "REF 13/45/24\nSOLD 02/30/2024\n02/29/2024";
        assert_eq!(extract_purchase_date(text), NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn test_no_date() {
        assert_eq!(extract_purchase_date("MILK 4.50\nTOTAL 4.50"), None);
    }
}
