//! In-memory fetcher for engine tests

use crate::{error::FetchError, fetch::Fetcher};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::Mutex,
    time::Duration,
};

/// Fetcher answering from a fixed table; unknown addresses are `NotFound`
pub struct ScriptedFetcher {
    base: String,
    responses: HashMap<String, Result<String, FetchError>>,
    delays: Vec<(String, Duration)>,
    requested: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::with_base("http://interop")
    }

    pub fn with_base(base: &str) -> Self {
        Self {
            base: base.to_string(),
            responses: HashMap::new(),
            delays: Vec::new(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn with_text(mut self, address: &str, text: &str) -> Self {
        self.responses.insert(address.to_string(), Ok(text.to_string()));
        self
    }

    pub fn with_error(mut self, address: &str, error: FetchError) -> Self {
        self.responses.insert(address.to_string(), Err(error));
        self
    }

    /// Delay every fetch whose address contains `needle`
    pub fn with_delay(mut self, needle: &str, delay: Duration) -> Self {
        self.delays.push((needle.to_string(), delay));
        self
    }

    /// Addresses fetched so far, in request order
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, address: &str) -> Result<String, FetchError> {
        self.requested.lock().unwrap().push(address.to_string());

        let delay = self
            .delays
            .iter()
            .find(|(needle, _)| address.contains(needle.as_str()))
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.responses
            .get(address)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::not_found(address)))
    }

    fn base(&self) -> &str {
        &self.base
    }

    fn describe(&self) -> &'static str {
        "scripted"
    }
}
