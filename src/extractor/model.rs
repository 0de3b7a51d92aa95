use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;
use url::Url;

/// One token row pulled out of a listing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenRecord {
    pub token: String,
    pub price_usd: f64,
    pub url: Option<String>,
}

/// Accumulates records in discovery order, dropping repeated
/// `(token, url)` pairs. The first occurrence wins.
#[derive(Debug)]
pub(crate) struct RecordSet {
    root: Url,
    seen: HashSet<(String, Option<String>)>,
    records: Vec<TokenRecord>,
}

impl RecordSet {
    /// `root` is the base URL with a trailing slash; hrefs are joined onto it.
    pub(crate) fn new(root: Url) -> Self {
        Self {
            root,
            seen: HashSet::new(),
            records: Vec::new(),
        }
    }

    /// Add a record unless its key was already seen. An empty href yields a
    /// record without URL; an href that cannot be resolved skips the row.
    pub(crate) fn insert(&mut self, token: String, price_usd: f64, href: &str) -> bool {
        let href = href.trim();
        let url = if href.is_empty() {
            None
        } else {
            match self.root.join(href) {
                Ok(url) => Some(url.to_string()),
                Err(err) => {
                    debug!(href, %err, "skipping row with unresolvable href");
                    return false;
                }
            }
        };

        if !self.seen.insert((token.clone(), url.clone())) {
            return false;
        }
        self.records.push(TokenRecord {
            token,
            price_usd,
            url,
        });
        true
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records by price, highest first. The sort is stable so equal prices
    /// keep discovery order.
    pub(crate) fn into_sorted(self) -> Vec<TokenRecord> {
        let mut records = self.records;
        records.sort_by(|a, b| b.price_usd.total_cmp(&a.price_usd));
        records
    }
}
