use super::{ProviderError, ProviderSearchRequest, ProviderSearchResponse, SearchProvider};
use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// Tavily search API client.
///
/// Issues a single POST to `{endpoint}/search` with the assembled parameters
/// and the API key in the request body. The HTTP client carries a
/// request-scoped timeout; a hung provider call surfaces as
/// [`ProviderError::Timeout`] rather than stalling the invocation.
#[derive(Debug, Clone)]
pub struct TavilyClient {
    client: Client,
    api_key: String,
    search_url: String,
}

impl TavilyClient {
    /// Create a new Tavily client from gateway configuration.
    ///
    /// Fails if the configured endpoint is not a valid URL or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &Config, api_key: String) -> Result<Self, ProviderError> {
        let base = Url::parse(&config.provider.endpoint)
            .map_err(|e| ProviderError::Other(format!("Invalid endpoint URL: {e}")))?;
        let search_url = base
            .join("/search")
            .map_err(|e| ProviderError::Other(format!("Invalid search URL: {e}")))?
            .to_string();

        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.provider.user_agent.clone())
            .build()
            .map_err(|e| ProviderError::Other(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            search_url,
        })
    }

    fn build_body(&self, request: &ProviderSearchRequest) -> Result<Value, ProviderError> {
        let mut body = serde_json::to_value(request)
            .map_err(|e| ProviderError::Other(format!("Failed to serialize request: {e}")))?;
        if let Some(map) = body.as_object_mut() {
            map.insert("api_key".to_string(), Value::String(self.api_key.clone()));
        }
        Ok(body)
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(
        &self,
        request: &ProviderSearchRequest,
    ) -> Result<ProviderSearchResponse, ProviderError> {
        let body = self.build_body(request)?;

        debug!(query = %request.query, depth = %request.search_depth,
               max_results = request.max_results, "Calling Tavily API");

        let response = self
            .client
            .post(&self.search_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else if e.is_connect() {
                    ProviderError::Network(format!("Connection failed: {e}"))
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, "Tavily API returned an error");
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::Auth(format!("Tavily rejected the API key: {text}")),
                400 | 422 => ProviderError::InvalidQuery(text),
                500..=599 => ProviderError::ServiceUnavailable(format!("{status}: {text}")),
                _ => ProviderError::Other(format!("Unexpected status {status}: {text}")),
            });
        }

        let parsed: ProviderSearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("Failed to decode Tavily response: {e}")))?;

        debug!(results = parsed.results.len(), "Tavily returned results");
        Ok(parsed)
    }

    fn name(&self) -> &str {
        "tavily"
    }
}
