use thiserror::Error;

/// Rejected configuration edits. Nothing is persisted when one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid URL. Must not end with '/': {0}")]
    InvalidAddress(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("server address is not configured")]
    NotConfigured,

    #[error("{0} is not used")]
    Unsupported(&'static str),

    #[error("page {0} has no image url")]
    MissingImageUrl(u32),

    #[error("unrecognized source url: {0}")]
    UnrecognizedUrl(String),
}
