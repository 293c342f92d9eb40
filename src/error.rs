//! Error types.
//!
//! Only caller-contract violations end up here. Unmatched or malformed log
//! lines never produce an error; they simply leave record fields empty.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Page index outside `1..=total_pages`.
    #[error("page {page} is out of range (valid pages: 1..={total_pages})")]
    InvalidPageRequest { page: usize, total_pages: usize },

    #[error("page size must be at least 1")]
    InvalidPageSize,

    /// The batcher was asked for a page before any records were loaded.
    #[error("no records loaded: scan a log before requesting pages")]
    NotScanned,

    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
