use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use plugin_interface::{HttpClient, Method, Request, Response};
use reqwest::{Client, ClientBuilder};
use tracing::debug;

/// Settings for the standalone client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30) }
    }
}

/// `HttpClient` backed by reqwest, for running outside a reader host.
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        // Servers usually live on a LAN address; resolve through the system resolver.
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .no_hickory_dns()
            .build()
            .context("building http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn execute(&self, request: Request) -> Result<Response> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let resp = builder
            .send()
            .await
            .with_context(|| format!("GET {}", request.url))?;
        let status = resp.status();
        debug!(url = %request.url, status = status.as_u16(), "response");
        let resp = resp
            .error_for_status()
            .with_context(|| format!("GET {}", request.url))?;
        let body = resp
            .bytes()
            .await
            .with_context(|| format!("reading body of {}", request.url))?;
        Ok(Response { status: status.as_u16(), body: body.to_vec() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds() {
        assert!(ReqwestClient::new().is_ok());
        let cfg = HttpClientConfig { timeout: Duration::from_secs(5) };
        assert!(ReqwestClient::with_config(cfg).is_ok());
    }
}
