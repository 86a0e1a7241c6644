use anyhow::{Context, Result};
use plugin_interface::Request;
use url::Url;

use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::mapping::{ResourceRef, SERIES_PATH};

pub const USER_AGENT: &str = concat!("Inkarr/", env!("CARGO_PKG_VERSION"));
pub const IMAGE_ACCEPT: &str = "image/*,*/*;q=0.8";

/// Builds request descriptors against the configured server.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    config: SourceConfig,
}

impl RequestBuilder {
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Headers sent with every request.
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![("User-Agent".to_string(), USER_AGENT.to_string())];
        if let Some(key) = self.config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            headers.push(("X-API-Key".to_string(), key.to_string()));
        }
        headers
    }

    fn url(&self, relative: &str, query: &[(&str, &str)]) -> Result<Url> {
        if self.config.base_url.is_empty() {
            return Err(SourceError::NotConfigured.into());
        }
        let raw = format!("{}{}", self.config.base_url, relative);
        let mut url = Url::parse(&raw).with_context(|| format!("invalid request url: {raw}"))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn get(&self, relative: &str, query: &[(&str, &str)]) -> Result<Request> {
        Ok(Request::get(self.url(relative, query)?, self.headers()))
    }

    pub fn list_series(&self) -> Result<Request> {
        self.get(SERIES_PATH, &[("includeChapters", "false"), ("includeVolumes", "false")])
    }

    pub fn series_details(&self, series_id: i64) -> Result<Request> {
        self.get(&format!("{SERIES_PATH}/{series_id}"), &[("includeCreators", "true")])
    }

    pub fn series_chapters(&self, series_id: i64) -> Result<Request> {
        self.get(
            &format!("{SERIES_PATH}/{series_id}"),
            &[("includeChapters", "true"), ("includeMediaFiles", "true")],
        )
    }

    /// Chapter or media-file detail.
    pub fn resource(&self, resource: ResourceRef) -> Result<Request> {
        self.resource_by_url(&resource.to_string())
    }

    pub fn resource_by_url(&self, relative_url: &str) -> Result<Request> {
        self.get(relative_url, &[])
    }

    /// Image URLs are already absolute; they are used verbatim.
    pub fn image(&self, image_url: &str) -> Request {
        let mut headers = self.headers();
        headers.push(("Accept".to_string(), IMAGE_ACCEPT.to_string()));
        Request::get(image_url, headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(key: &str) -> RequestBuilder {
        RequestBuilder::new(SourceConfig::new("http://nas:3000", key))
    }

    #[test]
    fn series_urls() {
        let b = builder("");
        assert_eq!(
            b.list_series().unwrap().url,
            "http://nas:3000/api/v1/series?includeChapters=false&includeVolumes=false"
        );
        assert_eq!(
            b.series_details(4).unwrap().url,
            "http://nas:3000/api/v1/series/4?includeCreators=true"
        );
        assert_eq!(
            b.series_chapters(4).unwrap().url,
            "http://nas:3000/api/v1/series/4?includeChapters=true&includeMediaFiles=true"
        );
    }

    #[test]
    fn resource_urls() {
        let b = builder("");
        assert_eq!(b.resource(ResourceRef::Chapter(9)).unwrap().url, "http://nas:3000/api/v1/chapter/9");
        assert_eq!(b.resource(ResourceRef::MediaFile(3)).unwrap().url, "http://nas:3000/api/v1/mediafile/3");
    }

    #[test]
    fn api_key_only_when_set() {
        let req = builder("").list_series().unwrap();
        assert_eq!(req.header("User-Agent"), Some(USER_AGENT));
        assert_eq!(req.header("X-API-Key"), None);

        let req = builder("s3cret").list_series().unwrap();
        assert_eq!(req.header("X-API-Key"), Some("s3cret"));
    }

    #[test]
    fn image_request_is_verbatim_with_accept() {
        let req = builder("k").image("http://nas:3000/api/v1/mediafile/3/page/2");
        assert_eq!(req.url, "http://nas:3000/api/v1/mediafile/3/page/2");
        assert_eq!(req.header("Accept"), Some(IMAGE_ACCEPT));
        assert_eq!(req.header("X-API-Key"), Some("k"));
    }

    #[test]
    fn unconfigured_server_is_an_error() {
        let b = RequestBuilder::new(SourceConfig::default());
        let err = b.list_series().unwrap_err();
        assert_eq!(err.downcast_ref::<SourceError>(), Some(&SourceError::NotConfigured));
    }
}
