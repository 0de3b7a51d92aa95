use regex::Regex;
use std::sync::LazyLock;

// Optional "$" and one whitespace, then either a comma-grouped number
// (at least one ",ddd" group) or a plain decimal.
static PRICE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$?\s?([0-9]{1,3}(?:,[0-9]{3})+(?:\.[0-9]+)?|[0-9]+(?:\.[0-9]+)?)").unwrap()
});

/// How far before a candidate to look for a dollar sign, in characters.
const DOLLAR_LOOKBEHIND: usize = 2;

/// First dollar-prefixed amount in `text`, with thousands separators removed.
///
/// Amounts too large to represent as a finite `f64` are skipped.
/// Bare numbers are ignored, so a leading rank or supply column does not
/// shadow the price: `"1 Tether USDT $1.00"` gives `1.0`.
pub fn extract_price(text: &str) -> Option<f64> {
    PRICE_REGEX.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        if !whole.as_str().starts_with('$') && !dollar_before(text, whole.start()) {
            return None;
        }
        caps[1]
            .replace(',', "")
            .parse()
            .ok()
            .filter(|price: &f64| price.is_finite())
    })
}

fn dollar_before(text: &str, at: usize) -> bool {
    text[..at].chars().rev().take(DOLLAR_LOOKBEHIND).any(|c| c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_price_with_cents() {
        assert_eq!(extract_price("Wrapped BTC $1,234.56 +2.1%"), Some(1234.56));
        assert_eq!(extract_price("$64,012,330.10"), Some(64_012_330.10));
    }

    #[test]
    fn space_after_dollar() {
        assert_eq!(extract_price("USDC $ 0.9998"), Some(0.9998));
        assert_eq!(extract_price("price:$  12.5"), Some(12.5));
    }

    #[test]
    fn ungrouped_price_is_read_whole() {
        assert_eq!(extract_price("$1234.56"), Some(1234.56));
    }

    #[test]
    fn leading_rank_is_not_a_price() {
        assert_eq!(extract_price("1 Tether USD (USDT) $1.00 0.01%"), Some(1.0));
        assert_eq!(extract_price("#12 holders 48,213 $0.25"), Some(0.25));
    }

    #[test]
    fn number_without_dollar_is_ignored() {
        assert_eq!(extract_price("Volume 1,000,000 Holders 512"), None);
        assert_eq!(extract_price("€5.00"), None);
    }

    #[test]
    fn no_digits_means_no_price() {
        assert_eq!(extract_price(""), None);
        assert_eq!(extract_price("Token name only $"), None);
    }

    #[test]
    fn multibyte_text_before_price() {
        assert_eq!(extract_price("Тезер ₮ $1.01"), Some(1.01));
        assert_eq!(extract_price("$\u{a0}3.5"), Some(3.5));
        assert_eq!(extract_price("$ab7"), None);
    }

    #[test]
    fn overflowing_amount_is_skipped() {
        let huge = format!("${}", "9".repeat(400));
        assert_eq!(extract_price(&huge), None);
        assert_eq!(extract_price(&format!("{huge} then $2.50")), Some(2.5));
    }
}
