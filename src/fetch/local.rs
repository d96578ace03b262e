//! Local filesystem realization of the fetcher
//!
//! Reads a mirror of the interop runner's result tree, where the address
//! `<root>/<run>/<server>_<client>/goodput/1/output.txt` is a file path.

use super::Fetcher;
use crate::error::FetchError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Fetcher reading files below a root directory
pub struct LocalFetcher {
    root: PathBuf,
    base: String,
}

impl LocalFetcher {
    /// Create a fetcher rooted at `root`
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        let root = root.into();
        let base = root.to_string_lossy().trim_end_matches('/').to_string();
        Self { root, base }
    }

    async fn root_present(&self) -> bool {
        tokio::fs::metadata(&self.root)
            .await
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false)
    }
}

#[async_trait]
impl Fetcher for LocalFetcher {
    async fn fetch(&self, address: &str) -> std::result::Result<String, FetchError> {
        let error = match tokio::fs::read_to_string(address).await {
            Ok(text) => return Ok(text),
            Err(error) => error,
        };

        if !self.root_present().await {
            return Err(FetchError::unreachable(
                address,
                format!("mirror root '{}' is gone", self.root.display()),
            ));
        }

        match error.kind() {
            ErrorKind::NotFound => Err(FetchError::not_found(address)),
            _ => Err(FetchError::transport(address, error.to_string())),
        }
    }

    fn base(&self) -> &str {
        &self.base
    }

    fn describe(&self) -> &'static str {
        "local"
    }
}
