//! Contract between a reader host and a manga source.
//!
//! The host owns networking, caching and rendering. A source only builds
//! request descriptors and turns response bodies into the records below.

pub use async_trait::async_trait;

// Records the host renders
pub mod model {
    use serde::{Deserialize, Serialize};

    /// Publication status as understood by the host.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum MangaStatus {
        #[default]
        Unknown,
        Ongoing,
        Completed,
        Licensed,
        PublishingFinished,
        Cancelled,
        OnHiatus,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct Manga {
        /// Source-relative URL; the only field a source needs to find the series again.
        pub url: String,
        pub title: String,
        pub thumbnail_url: Option<String>,
        pub description: Option<String>,
        pub author: Option<String>,
        pub artist: Option<String>,
        pub genre: Option<String>,
        pub status: MangaStatus,
        pub initialized: bool,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct Chapter {
        pub url: String,
        pub name: String,
        pub chapter_number: f32,
        /// Milliseconds since the Unix epoch, 0 when unknown.
        pub date_upload: i64,
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Page {
        pub index: u32,
        pub url: String,
        pub image_url: Option<String>,
    }

    /// One page of a listing.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct MangasPage {
        pub mangas: Vec<Manga>,
        pub has_next_page: bool,
    }
}

// Request descriptors and the host-supplied client
pub mod net {
    use anyhow::Result;
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub enum Method {
        Get,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Request {
        pub method: Method,
        pub url: String,
        pub headers: Vec<(String, String)>,
    }

    impl Request {
        pub fn get(url: impl Into<String>, headers: Vec<(String, String)>) -> Self {
            Self { method: Method::Get, url: url.into(), headers }
        }

        /// First header value with the given name, compared case-insensitively.
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Response {
        pub status: u16,
        pub body: Vec<u8>,
    }

    /// Performs requests on behalf of a source. Timeouts, retries and
    /// caching are the implementor's business.
    #[async_trait]
    pub trait HttpClient: Send + Sync {
        async fn execute(&self, request: Request) -> Result<Response>;
    }
}

pub use model::{Chapter, Manga, MangaStatus, MangasPage, Page};
pub use net::{HttpClient, Method, Request, Response};

/// A manga source as seen by the host.
#[async_trait]
pub trait Source: Send + Sync {
    fn id(&self) -> i64;
    fn name(&self) -> &str;
    fn lang(&self) -> &str;
    fn supports_latest(&self) -> bool;

    async fn list_series(&self, page: u32) -> anyhow::Result<MangasPage>;
    async fn latest_series(&self, page: u32) -> anyhow::Result<MangasPage>;
    async fn search_series(&self, page: u32, query: &str) -> anyhow::Result<MangasPage>;
    async fn series_detail(&self, manga: &Manga) -> anyhow::Result<Manga>;
    async fn chapter_list(&self, manga: &Manga) -> anyhow::Result<Vec<Chapter>>;
    async fn page_list(&self, chapter: &Chapter) -> anyhow::Result<Vec<Page>>;

    /// Request the host should issue to load a page image.
    fn image_request(&self, page: &Page) -> anyhow::Result<Request>;

    /// Resolve an image URL for a page that has none yet.
    async fn image_url(&self, page: &Page) -> anyhow::Result<String>;

    /// Link for "open in browser".
    fn manga_web_url(&self, manga: &Manga) -> anyhow::Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::get("http://x", vec![("X-API-Key".into(), "k".into())]);
        assert_eq!(req.header("x-api-key"), Some("k"));
        assert_eq!(req.header("accept"), None);
    }

    #[test]
    fn status_serializes_like_host_constants() {
        let s = serde_json::to_string(&MangaStatus::OnHiatus).unwrap();
        assert_eq!(s, "\"ON_HIATUS\"");
        assert_eq!(MangaStatus::default(), MangaStatus::Unknown);
    }
}
