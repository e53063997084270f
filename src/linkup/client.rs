use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, info, warn};

use super::types::{ErrorBody, SearchRequest, SearchResponse, SearchResult};
use crate::config::{ApiKey, Config};

const SEARCH_DEPTH: &str = "standard";
const OUTPUT_TYPE: &str = "searchResults";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const READ_TIMEOUT: Duration = Duration::from_secs(120);
const WRITE_TIMEOUT: Duration = Duration::from_secs(30);
const POOL_TIMEOUT: Duration = Duration::from_secs(30);

/// reqwest has no separate write or pool-acquire timeout, so the whole
/// exchange is capped instead. This is stricter than a per-read timeout:
/// a response still streaming after this deadline is cut off.
const REQUEST_DEADLINE: Duration = Duration::from_secs(
    CONNECT_TIMEOUT.as_secs() + READ_TIMEOUT.as_secs() + WRITE_TIMEOUT.as_secs() + POOL_TIMEOUT.as_secs(),
);

#[derive(Debug, thiserror::Error)]
pub enum LinkupError {
    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Web search returning raw result snippets.
/// Implemented by `LinkupClient` for production; mock implementations used in tests.
pub trait SearchClient: Send + Sync {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SearchResult>, LinkupError>> + Send;
}

#[derive(Debug, Clone)]
pub struct LinkupClient {
    http: Client,
    api_key: ApiKey,
    url: String,
}

impl LinkupClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(crate::USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(READ_TIMEOUT)
            .timeout(REQUEST_DEADLINE)
            .build()?;
        Ok(Self {
            http,
            api_key: config.linkup_api_key.clone(),
            url: config.linkup_url.clone(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_url(http: Client, url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey::new("test-key"),
            url: url.to_string(),
        }
    }
}

impl SearchClient for LinkupClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, LinkupError> {
        let request = SearchRequest {
            depth: SEARCH_DEPTH,
            output_type: OUTPUT_TYPE,
            q: query,
        };

        let started = Instant::now();
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(self.api_key.expose())
            .json(&request)
            .send()
            .await
            .inspect_err(|e| warn!(error = %e, "Linkup request failed"))?;

        let status = response.status();
        info!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Linkup responded"
        );

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(ErrorBody::message)
            {
                Some(message) => format!("HTTP {status}: {message}"),
                None => {
                    let end = text.floor_char_boundary(200);
                    format!("HTTP {status}: {}", &text[..end])
                }
            };
            warn!(status = %status, "Linkup API error");
            return Err(LinkupError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response.json().await?;
        let results = body.results.unwrap_or_default();
        debug!(results = results.len(), "linkup search complete");
        Ok(results)
    }
}
