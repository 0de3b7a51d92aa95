//! Final stage of a run: cap the record list, write it as JSON and build
//! the console summary.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::extractor::TokenRecord;

/// Number of records echoed to the console after a run.
pub const PREVIEW_COUNT: usize = 3;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Keep the first `limit` records. Zero or negative keeps all of them.
pub fn truncate(mut records: Vec<TokenRecord>, limit: i64) -> Vec<TokenRecord> {
    if let Ok(limit) = usize::try_from(limit)
        && limit > 0
    {
        records.truncate(limit);
    }
    records
}

/// Write `records` as an indented JSON array, replacing any existing file.
pub fn write_json(path: &Path, records: &[TokenRecord]) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), count = records.len(), "wrote records");
    Ok(())
}

/// Summary lines for the console: a count, then the top few records.
pub fn report(records: &[TokenRecord], path: &Path) -> Vec<String> {
    let mut lines = vec![format!("Saved {} records to {}", records.len(), path.display())];
    if !records.is_empty() {
        lines.push(format!("Top {PREVIEW_COUNT}:"));
        lines.extend(records.iter().take(PREVIEW_COUNT).map(|r| {
            format!(
                "- {} | ${:?} | {}",
                r.token,
                r.price_usd,
                r.url.as_deref().unwrap_or("null")
            )
        }));
    }
    lines
}
