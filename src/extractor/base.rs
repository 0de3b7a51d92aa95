use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

/// Host used when neither the source nor the document names one.
pub const DEFAULT_BASE: &str = "https://etherscan.io";

static BASE_TAG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("base").unwrap());

static CANONICAL_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"link[rel~="canonical"]"#).unwrap());

/// Scheme and host that relative links in `document` should resolve against.
///
/// Tried in order: the source hint itself, the first `<base href>`, the first
/// canonical `<link>`, then [`DEFAULT_BASE`]. Only absolute URLs with a host
/// count; anything else moves on to the next candidate.
pub fn resolve_base(source_hint: &str, document: &Html) -> String {
    origin_of(source_hint)
        .or_else(|| first_href(document, &BASE_TAG).and_then(origin_of))
        .or_else(|| first_href(document, &CANONICAL_LINK).and_then(origin_of))
        .unwrap_or_else(|| DEFAULT_BASE.to_string())
}

fn first_href<'a>(document: &'a Html, selector: &Selector) -> Option<&'a str> {
    document.select(selector).next()?.value().attr("href")
}

fn origin_of(candidate: &str) -> Option<String> {
    let url = Url::parse(candidate.trim()).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}
