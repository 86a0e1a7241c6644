use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use plugin_interface::{Chapter, HttpClient, Manga, MangasPage, Page, Request, Source};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::config::SourceConfig;
use crate::dto::{ChapterDto, MediaFileDto, SeriesDto};
use crate::error::SourceError;
use crate::mapping::{
    chapters_from_series, manga_from_series, pages_from_chapter, pages_from_media_file,
    series_id_from_url, series_matches, ResourceRef,
};
use crate::request::RequestBuilder;

pub const SOURCE_NAME: &str = "Inkarr";
pub const SOURCE_LANG: &str = "all";
pub const VERSION_ID: u32 = 1;

/// Source adapter for one Inkarr server.
pub struct Inkarr {
    requests: RequestBuilder,
    client: Arc<dyn HttpClient>,
    id: i64,
}

impl Inkarr {
    /// `config` is captured once; later preference edits need a new instance.
    pub fn new(config: SourceConfig, client: Arc<dyn HttpClient>) -> Self {
        Self { requests: RequestBuilder::new(config), client, id: source_id(VERSION_ID) }
    }

    pub fn requests(&self) -> &RequestBuilder {
        &self.requests
    }

    fn base_url(&self) -> &str {
        self.requests.base_url()
    }

    async fn fetch<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        debug!(url = %request.url, "fetching");
        let url = request.url.clone();
        let resp = self.client.execute(request).await?;
        if !(200..300).contains(&resp.status) {
            bail!("HTTP {} for {url}", resp.status);
        }
        serde_json::from_slice(&resp.body).with_context(|| format!("decoding response from {url}"))
    }

    async fn fetch_series_list(&self) -> Result<Vec<SeriesDto>> {
        self.fetch(self.requests.list_series()?).await
    }

    fn series_id(manga: &Manga) -> Result<i64> {
        series_id_from_url(&manga.url).ok_or_else(|| SourceError::UnrecognizedUrl(manga.url.clone()).into())
    }

    fn to_page(&self, series: &[SeriesDto]) -> MangasPage {
        MangasPage {
            mangas: series.iter().map(|s| manga_from_series(s, self.base_url())).collect(),
            has_next_page: false,
        }
    }
}

/// Stable positive id for the source, derived from its name, language and version.
pub fn source_id(version: u32) -> i64 {
    let key = format!("{}/{}/{}", SOURCE_NAME.to_lowercase(), SOURCE_LANG, version);
    let (hi, _) = Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).as_u64_pair();
    (hi & i64::MAX as u64) as i64
}

#[async_trait]
impl Source for Inkarr {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn lang(&self) -> &str {
        SOURCE_LANG
    }

    fn supports_latest(&self) -> bool {
        true
    }

    async fn list_series(&self, _page: u32) -> Result<MangasPage> {
        let series = self.fetch_series_list().await?;
        Ok(self.to_page(&series))
    }

    async fn latest_series(&self, page: u32) -> Result<MangasPage> {
        self.list_series(page).await
    }

    async fn search_series(&self, _page: u32, query: &str) -> Result<MangasPage> {
        let series: Vec<SeriesDto> = self
            .fetch_series_list()
            .await?
            .into_iter()
            .filter(|s| series_matches(s, query))
            .collect();
        debug!(query, hits = series.len(), "search");
        Ok(self.to_page(&series))
    }

    async fn series_detail(&self, manga: &Manga) -> Result<Manga> {
        let id = Self::series_id(manga)?;
        let series: SeriesDto = self.fetch(self.requests.series_details(id)?).await?;
        Ok(manga_from_series(&series, self.base_url()))
    }

    async fn chapter_list(&self, manga: &Manga) -> Result<Vec<Chapter>> {
        let id = Self::series_id(manga)?;
        let series: SeriesDto = self.fetch(self.requests.series_chapters(id)?).await?;
        Ok(chapters_from_series(&series))
    }

    async fn page_list(&self, chapter: &Chapter) -> Result<Vec<Page>> {
        let resource = ResourceRef::from_url(&chapter.url)
            .ok_or_else(|| SourceError::UnrecognizedUrl(chapter.url.clone()))?;
        let request = self.requests.resource(resource)?;
        match resource {
            ResourceRef::MediaFile(_) => {
                let file: MediaFileDto = self.fetch(request).await?;
                Ok(pages_from_media_file(&file, self.base_url(), 0))
            }
            ResourceRef::Chapter(_) => {
                let chapter: ChapterDto = self.fetch(request).await?;
                Ok(pages_from_chapter(&chapter, self.base_url()))
            }
        }
    }

    fn image_request(&self, page: &Page) -> Result<Request> {
        let url = page
            .image_url
            .as_deref()
            .ok_or(SourceError::MissingImageUrl(page.index))?;
        Ok(self.requests.image(url))
    }

    // Page lists always carry resolved image urls.
    async fn image_url(&self, _page: &Page) -> Result<String> {
        Err(SourceError::Unsupported("image_url").into())
    }

    fn manga_web_url(&self, manga: &Manga) -> Result<String> {
        let id = Self::series_id(manga)?;
        Ok(format!("{}/series/{id}", self.base_url()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_id_is_stable_and_positive() {
        assert_eq!(source_id(1), source_id(1));
        assert_ne!(source_id(1), source_id(2));
        assert!(source_id(1) >= 0);
    }
}
