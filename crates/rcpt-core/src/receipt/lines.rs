//! Line normalization.

/// A trimmed, non-empty line and its position in the normalized sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub text: String,
    pub order: usize,
}

/// Split text into trimmed, non-empty lines numbered from 0.
pub fn normalize_lines(text: &str) -> Vec<RawLine> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .enumerate()
        .map(|(order, l)| RawLine {
            text: l.to_string(),
            order,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_orders_follow_kept_lines() {
        let lines = normalize_lines("  WALMART \r\n\r\n\t\n123456 BANANAS\n  2.99  ");
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        let orders: Vec<usize> = lines.iter().map(|l| l.order).collect();

        assert_eq!(texts, vec!["WALMART", "123456 BANANAS", "2.99"]);
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_blank_input() {
        assert!(normalize_lines("").is_empty());
        assert!(normalize_lines(" \n\t\r\n ").is_empty());
    }
}
