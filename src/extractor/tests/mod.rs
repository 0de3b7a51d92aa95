use std::fs;

use serde_json::json;

use crate::extractor::{TokenRecord, parse_tokens, rows::UNKNOWN_LABEL};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

fn record(token: &str, price_usd: f64, url: &str) -> TokenRecord {
    TokenRecord {
        token: token.to_string(),
        price_usd,
        url: Some(url.to_string()),
    }
}

#[test]
fn test_etherscan_listing() {
    let html = fixture("etherscan.html");
    let records = parse_tokens(&html, "https://etherscan.io/tokens");

    assert_eq!(
        records,
        vec![
            record(
                "WETH",
                3412.07,
                "https://etherscan.io/token/0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"
            ),
            record(
                "stETH",
                3401.88,
                "https://etherscan.io/token/0xae7ab96520de3a18e5e111b5eaab095312d7fe84"
            ),
            record(
                "BNB (BNB)",
                612.55,
                "https://etherscan.io/token/0xb8c77482e45f1f44de1745f52c74426c631bdd52"
            ),
            record(
                "Tether USD (USDT)",
                1.0,
                "https://etherscan.io/token/0xdac17f958d2ee523a2206206994597c13d831ec7"
            ),
            record(
                "Dai Stablecoin (DAI)",
                1.0,
                "https://etherscan.io/token/0x6b175474e89094c44da98b954eedeac495271d0f"
            ),
        ]
    );
}

#[test]
fn test_saved_page_uses_canonical_host() {
    let html = fixture("etherscan.html");
    let records = parse_tokens(&html, "dumps/etherscan.html");

    assert_eq!(records.len(), 5);
    assert!(
        records
            .iter()
            .all(|r| r.url.as_deref().unwrap().starts_with("https://etherscan.io/token/0x"))
    );
}

#[test]
fn test_parse_is_deterministic() {
    let html = fixture("etherscan.html");

    let first = parse_tokens(&html, "https://etherscan.io/tokens");
    let second = parse_tokens(&html, "https://etherscan.io/tokens");
    assert_eq!(first, second);
}

#[test]
fn test_single_row_table() {
    let html = r#"<html><body><table><tr>
        <td><a href="/token/0xABC">FOO</a></td><td>$3.50</td>
    </tr></table></body></html>"#;

    let records = parse_tokens(html, "https://etherscan.io/tokens");
    assert_eq!(
        serde_json::to_value(&records).unwrap(),
        json!([{"token": "FOO", "price_usd": 3.5, "url": "https://etherscan.io/token/0xABC"}])
    );
}

#[test]
fn test_duplicate_anchors_collapse() {
    let html = r#"<table>
        <tr><td><a href="/token/0xabc">FOO</a></td><td>$2.00</td></tr>
        <tr><td><a href="https://example.com/token/0xabc">FOO</a></td><td>$7.00</td></tr>
        <tr><td><a href="/token/0xabc">Foo</a></td><td>$3.00</td></tr>
    </table>"#;

    let records = parse_tokens(html, "https://example.com");
    assert_eq!(
        records,
        vec![
            record("Foo", 3.0, "https://example.com/token/0xabc"),
            record("FOO", 2.0, "https://example.com/token/0xabc"),
        ]
    );
}

#[test]
fn test_card_layout_with_base_tag() {
    let html = fixture("cards.html");
    let records = parse_tokens(&html, "saved/cards.html");

    assert_eq!(
        records,
        vec![
            record("Optimism", 1.63, "https://foo.io/tokens/optimism"),
            record("ARB", 0.7421, "https://foo.io/tokens/arbitrum"),
        ]
    );
}

#[test]
fn test_fallback_rows_without_token_links() {
    let html = fixture("fallback.html");
    let records = parse_tokens(&html, "https://www.coingecko.com/en");

    assert_eq!(
        records,
        vec![
            record("Bitcoin", 67250.12, "https://www.coingecko.com/en/coins/bitcoin"),
            record("Ethereum", 3410.0, "https://www.coingecko.com/en/coins/ethereum"),
            record(UNKNOWN_LABEL, 0.0042, "https://www.coingecko.com/en/coins/mystery"),
        ]
    );
}

#[test]
fn test_fallback_skipped_when_token_links_priced() {
    let html = r#"<table>
        <tr><td><a href="/token/0x1">ONE</a></td><td>$1.00</td></tr>
        <tr><td><a href="/coins/two">TWO</a></td><td>$200.00</td></tr>
    </table>"#;

    let records = parse_tokens(html, "https://etherscan.io");
    assert_eq!(records, vec![record("ONE", 1.0, "https://etherscan.io/token/0x1")]);
}

#[test]
fn test_page_without_prices() {
    let html = r#"<html><body><h1>Maintenance</h1>
        <a href="/token/0x1">Token</a><ul><li><a href="/x">x</a> 42</li></ul>
    </body></html>"#;

    assert!(parse_tokens(html, "https://etherscan.io/tokens").is_empty());
    assert!(parse_tokens("", "https://etherscan.io/tokens").is_empty());
}

#[test]
fn test_malformed_html() {
    let html = "<table><tr><td><a href='/token/0x9'>BROKEN<td>$5<tr><td>unclosed";

    let records = parse_tokens(html, "https://etherscan.io");
    assert_eq!(records, vec![record("BROKEN", 5.0, "https://etherscan.io/token/0x9")]);
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use crate::extractor::extract_price;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_parse_never_panics(
            html in ".*",
            hint in "(https://[a-z]+\\.com/.*)|([a-z/]+\\.html)",
        ) {
            let _ = parse_tokens(&html, &hint);
        }

        #[test]
        fn test_parse_sorted_and_unique(html in "(<tr><td><a href=\"/token/[a-c]\">[A-C]</a></td><td>\\$[0-9]{1,4}</td></tr>){0,12}") {
            let html = format!("<table>{html}</table>");
            let records = parse_tokens(&html, "https://etherscan.io");

            prop_assert!(records.windows(2).all(|w| w[0].price_usd >= w[1].price_usd));
            let mut keys: Vec<_> = records.iter().map(|r| (&r.token, &r.url)).collect();
            let total = keys.len();
            keys.sort();
            keys.dedup();
            prop_assert_eq!(keys.len(), total);
        }

        #[test]
        fn test_digit_free_text_has_no_price(text in "[^0-9]*") {
            prop_assert_eq!(extract_price(&text), None);
        }
    }
}
