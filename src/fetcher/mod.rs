pub mod client;
pub mod errors;
pub mod pipeline;
pub mod source;
pub mod types;

pub use client::fetch;
pub use errors::FetchError;
pub use source::load_source;
pub use types::{Charset, LoadedSource, PageResponse, SourceKind};
