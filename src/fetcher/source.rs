use std::path::Path;

use tracing::{debug, instrument};
use url::Url;

use crate::fetcher::{
    client::fetch,
    errors::FetchError,
    pipeline::decode_file,
    types::{LoadedSource, SourceKind},
};

/// Resolve a source designator into HTML text.
///
/// An absolute `http`/`https` URL is fetched over the network; anything else
/// must name an existing file. No caching and no retries.
#[instrument(skip_all, fields(source = %source))]
pub async fn load_source(source: &str) -> Result<LoadedSource, FetchError> {
    if let Ok(url) = Url::parse(source)
        && matches!(url.scheme(), "http" | "https")
    {
        let page = fetch(url.as_str()).await?;
        return Ok(LoadedSource {
            origin: SourceKind::Url(page.url_final),
            html: page.body_utf8,
            charset: page.charset,
        });
    }

    let path = Path::new(source);
    if !path.is_file() {
        return Err(FetchError::SourceNotFound(source.to_string()));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| FetchError::Io(format!("{}: {e}", path.display())))?;
    let (html, charset) = decode_file(&bytes);
    debug!(charset = ?charset, bytes = bytes.len(), "read local file");

    Ok(LoadedSource {
        origin: SourceKind::File(path.to_path_buf()),
        html,
        charset,
    })
}
