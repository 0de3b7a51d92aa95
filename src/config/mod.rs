//! Configuration handling for the scraper.
//!
//! Values are layered: built-in defaults, then environment variables (see
//! [`Config::from_env`]), then command-line flags applied by the binary via
//! [`Config::with_overrides`].

use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable names. Public so tests and scripts can refer to them.
pub const ENV_SOURCE: &str = "TOKENSCRAPE_SOURCE";
pub const ENV_LIMIT: &str = "TOKENSCRAPE_LIMIT";
pub const ENV_OUT: &str = "TOKENSCRAPE_OUT";

/// Token listing scraped when no source is given.
pub const DEFAULT_SOURCE: &str = "https://etherscan.io/tokens";
pub const DEFAULT_LIMIT: i64 = 1000;
pub const DEFAULT_OUT: &str = "tokens.json";

/// Runtime configuration for one scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    source: String,
    limit: i64,
    out: PathBuf,
}

impl Config {
    pub fn new(source: impl Into<String>, limit: i64, out: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            limit,
            out: out.into(),
        }
    }

    /// Load from environment variables, falling back to the defaults.
    ///
    /// Fails when `TOKENSCRAPE_LIMIT` is not an integer or when the source or
    /// output path is empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let source = env::var(ENV_SOURCE).unwrap_or_else(|_| DEFAULT_SOURCE.to_string());
        let limit = match env::var(ENV_LIMIT) {
            Ok(raw) => parse_limit(&raw)?,
            Err(_) => DEFAULT_LIMIT,
        };
        let out = env::var(ENV_OUT).unwrap_or_else(|_| DEFAULT_OUT.to_string());

        Self::new(source, limit, out).validated()
    }

    /// Replace any value for which an override is present.
    pub fn with_overrides(
        mut self,
        source: Option<String>,
        limit: Option<i64>,
        out: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(source) = source {
            self.source = source;
        }
        if let Some(limit) = limit {
            self.limit = limit;
        }
        if let Some(out) = out {
            self.out = out;
        }
        self.validated()
    }

    /// URL or local file path to read the listing from.
    pub fn source(&self) -> &str {
        &self.source
    }
    /// Maximum number of records to keep; zero or negative keeps everything.
    pub fn limit(&self) -> i64 {
        self.limit
    }
    /// Where the JSON result is written.
    pub fn out(&self) -> &Path {
        &self.out
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.source.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "source",
                reason: "must not be empty".to_string(),
            });
        }
        if self.out.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "out",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE, DEFAULT_LIMIT, DEFAULT_OUT)
    }
}

fn parse_limit(raw: &str) -> Result<i64, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|err: std::num::ParseIntError| ConfigError::InvalidValue {
            field: "limit",
            reason: format!("{raw:?} is not an integer ({err})"),
        })
}

/// Errors that can occur while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
