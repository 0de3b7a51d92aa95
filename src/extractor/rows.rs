use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::trace;

use crate::extractor::{model::RecordSet, price::extract_price};

static TOKEN_ANCHORS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[href*="/token/"], a[href*="/tokens/"], a[href*="/tokenholdings"]"#)
        .unwrap()
});

static FALLBACK_ROWS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"tr, li, [role="row"]"#).unwrap());

static LINKED_ANCHORS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Attributes that carry a ticker symbol, in order of preference.
const SYMBOL_ATTRS: [&str; 3] = ["data-symbol", "data-coin-symbol", "data-symbol-short"];

/// Label for fallback rows whose link has no text.
pub const UNKNOWN_LABEL: &str = "UNKNOWN";

/// Anchors pointing at token detail pages, priced from their enclosing row.
pub(crate) fn collect_token_links(document: &Html, records: &mut RecordSet) {
    for anchor in document.select(&TOKEN_ANCHORS) {
        let href = anchor.value().attr("href").unwrap_or_default().trim();
        let text = visible_text(anchor);
        if href.is_empty() || text.is_empty() {
            continue;
        }

        let row = enclosing_row(anchor);
        let row_text = row.map(visible_text).unwrap_or_else(|| text.clone());
        let Some(price) = extract_price(&row_text) else {
            trace!(href, "no price near token link");
            continue;
        };

        let label = symbol_label(row, anchor).unwrap_or(text);
        records.insert(label, price, href);
    }
}

/// Any row with a price and a link, labelled by the first link's text.
pub(crate) fn collect_priced_rows(document: &Html, records: &mut RecordSet) {
    for row in document.select(&FALLBACK_ROWS) {
        let Some(price) = extract_price(&visible_text(row)) else {
            continue;
        };
        let Some(anchor) = row.select(&LINKED_ANCHORS).next() else {
            trace!(price, "priced row without a link");
            continue;
        };

        let text = visible_text(anchor);
        let label = if text.is_empty() {
            UNKNOWN_LABEL.to_string()
        } else {
            text
        };
        records.insert(label, price, anchor.value().attr("href").unwrap_or_default());
    }
}

/// Text nodes under `element`, trimmed and joined with single spaces.
pub(crate) fn visible_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Nearest `<tr>`, otherwise the nearest ancestor that looks like a row.
fn enclosing_row<'a>(anchor: ElementRef<'a>) -> Option<ElementRef<'a>> {
    ancestors(anchor)
        .find(|el| el.value().name() == "tr")
        .or_else(|| ancestors(anchor).find(is_row_like))
}

fn ancestors<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.ancestors().filter_map(ElementRef::wrap)
}

fn is_row_like(element: &ElementRef<'_>) -> bool {
    let el = element.value();
    el.attr("role") == Some("row") || matches!(el.name(), "tr" | "li" | "div")
}

fn symbol_label(row: Option<ElementRef<'_>>, anchor: ElementRef<'_>) -> Option<String> {
    SYMBOL_ATTRS.iter().find_map(|name| {
        row.and_then(|row| non_blank_attr(row, name))
            .or_else(|| non_blank_attr(anchor, name))
            .map(str::to_string)
    })
}

fn non_blank_attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
