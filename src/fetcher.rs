//! HTTP fetcher for downloading published crawler IP ranges.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{GoodBotsError, Result};
use crate::sources::{decode, SourceConfig};
use crate::utils::format_count;

const TIMEOUT_SECS: u64 = 30;

/// Maximum size of one provider response (10 MB)
const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;

/// Raw IP specifications published by one source
#[derive(Debug)]
pub struct FetchResult {
    pub name: String,
    pub specs: Vec<String>,
}

/// HTTP client for fetching range lists
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a new fetcher with default settings
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .user_agent(format!("good-bots/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GoodBotsError::Fetch(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Fetch one source and decode it according to its response shape.
    ///
    /// Network and status failures are `Fetch` errors; a body that does not
    /// match the declared shape is a `Schema` error.
    pub async fn fetch_source(&self, source: &SourceConfig) -> Result<FetchResult> {
        let name = source.display_name();
        info!("Fetching {}...", name);

        let body = self.fetch_text(&source.url).await?;
        let specs = decode(source.shape, &body)?;

        info!("Fetched {} - {} entries", name, format_count(specs.len()));

        Ok(FetchResult { name, specs })
    }

    /// GET a URL and return its body, enforcing the size limit.
    async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GoodBotsError::Fetch(format!("Error fetching {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GoodBotsError::Fetch(format!("HTTP {} from {}", status, url)));
        }

        if let Some(content_length) = response.content_length() {
            if content_length as usize > MAX_RESPONSE_SIZE {
                return Err(GoodBotsError::Fetch(format!(
                    "Response too large: {} bytes (max: {} bytes)",
                    content_length, MAX_RESPONSE_SIZE
                )));
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| GoodBotsError::Fetch(format!("Failed to read response body: {}", e)))?;

        // Content-Length may be absent on chunked responses
        if body.len() > MAX_RESPONSE_SIZE {
            return Err(GoodBotsError::Fetch(format!(
                "Downloaded content too large: {} bytes (max: {} bytes)",
                body.len(),
                MAX_RESPONSE_SIZE
            )));
        }

        Ok(body)
    }
}

// Note: Default is intentionally not implemented for Fetcher
// because new() can fail and we want explicit error handling.
