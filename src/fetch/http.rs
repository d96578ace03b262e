//! HTTP realization of the fetcher

use super::Fetcher;
use crate::error::{AppError, FetchError, Result};
use async_trait::async_trait;
use reqwest::{Client, Proxy, StatusCode};
use std::time::Duration;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetcher issuing plain GET requests against the interop runner
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    /// Create a fetcher rooted at `base_url`
    pub fn new(base_url: &str, timeout: Duration, proxy: Option<&str>) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(USER_AGENT);

        if let Some(proxy_url) = proxy {
            let proxy = Proxy::all(proxy_url)
                .map_err(|e| AppError::config(format!("Invalid proxy '{}': {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn classify_send_error(address: &str, error: &reqwest::Error) -> FetchError {
        if error.is_connect() {
            FetchError::unreachable(address, error.to_string())
        } else if error.is_timeout() {
            FetchError::transport(address, format!("timed out: {}", error))
        } else {
            FetchError::transport(address, error.to_string())
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, address: &str) -> std::result::Result<String, FetchError> {
        let response = self
            .client
            .get(address)
            .send()
            .await
            .map_err(|e| Self::classify_send_error(address, &e))?;

        match response.status() {
            StatusCode::OK => response
                .text()
                .await
                .map_err(|e| FetchError::transport(address, format!("failed to read body: {}", e))),
            StatusCode::NOT_FOUND => Err(FetchError::not_found(address)),
            status => Err(FetchError::transport(address, format!("HTTP {}", status.as_u16()))),
        }
    }

    fn base(&self) -> &str {
        &self.base_url
    }

    fn describe(&self) -> &'static str {
        "http"
    }
}
