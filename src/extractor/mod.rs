pub mod base;
pub mod model;
pub mod price;
pub mod rows;

#[cfg(test)]
mod tests;

pub use base::resolve_base;
pub use model::TokenRecord;
pub use price::extract_price;

use scraper::Html;
use tracing::{debug, info, warn};
use url::Url;

use crate::extractor::model::RecordSet;

/// Pull priced token records out of a listing page.
///
/// `source_hint` is the URL or path the HTML came from; it only feeds base
/// URL resolution. The result is deduplicated on `(token, url)` and sorted
/// by price, highest first.
pub fn parse_tokens(html: &str, source_hint: &str) -> Vec<TokenRecord> {
    let document = Html::parse_document(html);
    let base = resolve_base(source_hint, &document);

    let root = match Url::parse(&format!("{base}/")) {
        Ok(root) => root,
        Err(err) => {
            warn!(%base, %err, "unusable base url");
            return Vec::new();
        }
    };

    // 1. Links to token detail pages
    let mut records = RecordSet::new(root);
    rows::collect_token_links(&document, &mut records);

    // 2. Any priced row with a link
    if records.is_empty() {
        debug!("no priced token links, scanning rows");
        rows::collect_priced_rows(&document, &mut records);
    }

    let records = records.into_sorted();
    info!(count = records.len(), %base, "extracted token records");
    records
}
