//! In-memory fetcher for offline builds, tests and benchmarks.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{CompendiumError, Result};

use super::Fetcher;

/// Serves fixed bodies by URI and answers `404 Not Found` for anything else.
///
/// Every request is recorded, so callers can assert how often the network
/// would have been hit.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    bodies: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `uri`.
    pub fn with(mut self, uri: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.insert(uri, body);
        self
    }

    pub fn insert(&mut self, uri: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.bodies.insert(uri.into(), body.into());
    }

    /// URIs requested so far, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of requests made so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(uri.to_string());
        }

        self.bodies.get(uri).cloned().ok_or_else(|| CompendiumError::Fetch {
            uri: uri.to_string(),
            message: "HTTP 404 Not Found".to_string(),
        })
    }
}
