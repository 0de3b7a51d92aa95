#![no_main]

use libfuzzer_sys::fuzz_target;

use tokenscrape::extractor::{extract_price, parse_tokens};

fuzz_target!(|data: &[u8]| {
    // Convert raw bytes to string, handling invalid UTF-8 gracefully
    let html = String::from_utf8_lossy(data);

    // Neither stage should panic regardless of input
    let _ = extract_price(&html);
    let records = parse_tokens(&html, "https://etherscan.io/tokens");
    assert!(records.windows(2).all(|w| w[0].price_usd >= w[1].price_usd));
});
