//! Fetching raw sub-test output and listings
//!
//! The engine reads everything through [`Fetcher`], so a crawl against the
//! public interop runner and a crawl against a local mirror of its result
//! tree run the same code. [`create_fetcher`] picks the realization from the
//! configured base.

pub mod http;
pub mod local;


pub use http::HttpFetcher;
pub use local::LocalFetcher;

use crate::{
    error::{AppError, FetchError, Result},
    models::Config,
};
use async_trait::async_trait;
use std::{path::PathBuf, sync::Arc};

/// Source of raw text addressed by `/`-joined paths under [`Fetcher::base`]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Retrieve the text stored at `address`
    async fn fetch(&self, address: &str) -> std::result::Result<String, FetchError>;

    /// Root every address is built from
    fn base(&self) -> &str;

    /// Short name of the realization for logs
    fn describe(&self) -> &'static str;

    /// Address of `relative` under the root
    fn address_of(&self, relative: &str) -> String {
        join_address(self.base(), relative)
    }
}

/// Join two address fragments with exactly one `/`
pub fn join_address(base: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

/// Build the fetcher the configuration points at
///
/// http(s) URLs get an [`HttpFetcher`]; `file://` URLs and plain paths naming
/// an existing directory get a [`LocalFetcher`].
pub fn create_fetcher(config: &Config) -> Result<Arc<dyn Fetcher>> {
    if config.is_remote() {
        let fetcher = HttpFetcher::new(&config.base_url, config.timeout(), config.proxy.as_deref())?;
        return Ok(Arc::new(fetcher));
    }

    let root = match url::Url::parse(&config.base_url) {
        Ok(parsed) if parsed.scheme() == "file" => parsed
            .to_file_path()
            .map_err(|_| AppError::config(format!("Invalid file URL '{}'", config.base_url)))?,
        _ => PathBuf::from(&config.base_url),
    };

    if !root.is_dir() {
        return Err(AppError::config(format!(
            "Base '{}' is neither an http(s) URL nor an existing directory",
            config.base_url
        )));
    }

    Ok(Arc::new(LocalFetcher::new(root)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_with_base(base: &str) -> Config {
        Config {
            base_url: base.to_string(),
            clients: vec!["a".into()],
            servers: vec!["a".into()],
            ..Config::default()
        }
    }

    #[test]
    fn test_join_address() {
        assert_eq!(join_address("http://h/", "/logs.json"), "http://h/logs.json");
        assert_eq!(join_address("http://h", "run/a_b"), "http://h/run/a_b");
        assert_eq!(join_address("/data/mirror", "logs.json"), "/data/mirror/logs.json");
    }

    #[test]
    fn test_remote_base_selects_http() {
        let fetcher = create_fetcher(&config_with_base("https://interop.example.org")).unwrap();
        assert_eq!(fetcher.describe(), "http");
        assert_eq!(fetcher.address_of("logs.json"), "https://interop.example.org/logs.json");
    }

    #[test]
    fn test_directory_base_selects_local() {
        let dir = TempDir::new().unwrap();
        let fetcher = create_fetcher(&config_with_base(dir.path().to_str().unwrap())).unwrap();
        assert_eq!(fetcher.describe(), "local");
    }

    #[test]
    fn test_missing_directory_rejected() {
        let Err(error) = create_fetcher(&config_with_base("/definitely/not/a/mirror")) else {
            panic!("missing mirror directory must be a config error");
        };
        assert!(matches!(error, AppError::Config(_)));
    }
}
