pub mod config;
pub mod dto;
pub mod error;
pub mod http_client;
pub mod mapping;
pub mod request;
pub mod source;

// --- Library API for embedding ---

/// Convenience re-exports for hosts.
pub mod prelude {
    pub use plugin_interface::{Chapter, HttpClient, Manga, MangaStatus, MangasPage, Page, Request, Response, Source};
    pub use crate::config::{Preferences, RestartNotice, SourceConfig};
    pub use crate::error::{ConfigError, SourceError};
    pub use crate::source::Inkarr;
}

pub use source::Inkarr;
