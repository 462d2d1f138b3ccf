//! HTTP(S) fetcher backed by a blocking `ureq` agent.

use std::io::Read;
use std::time::Duration;

use crate::error::{CompendiumError, Result};

use super::Fetcher;

/// Blocking HTTP client with a per-request timeout.
#[derive(Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    /// Create a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("compendium/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>> {
        let response = match self.agent.get(uri).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                return Err(CompendiumError::Fetch {
                    uri: uri.to_string(),
                    message: format!("HTTP {} {}", code, response.status_text()),
                });
            }
            Err(e) => {
                return Err(CompendiumError::Fetch {
                    uri: uri.to_string(),
                    message: e.to_string(),
                });
            }
        };

        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| CompendiumError::Fetch {
                uri: uri.to_string(),
                message: format!("Failed to read response body: {}", e),
            })?;

        tracing::debug!(uri, bytes = body.len(), "downloaded");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_host_is_fetch_error() {
        let fetcher = HttpFetcher::new(Duration::from_millis(500));

        // Port 9 on localhost is the discard service; nothing listens there in CI.
        let result = fetcher.fetch("http://127.0.0.1:9/monsters.json");

        assert!(matches!(result, Err(CompendiumError::Fetch { .. })));
    }
}
