pub mod tavily;

pub use tavily::TavilyClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Fully assembled search parameters sent to the provider.
///
/// This is the wire shape: optional fields are omitted from the serialized
/// request rather than sent as null.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProviderSearchRequest {
    pub query: String,
    pub search_depth: String,
    pub max_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,
    pub include_answer: bool,
    pub include_raw_content: bool,
    pub include_images: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_domains: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_domains: Option<Vec<String>>,
}

/// One raw result item as returned by the provider
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSearchResult {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

/// The provider's raw response body
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProviderSearchResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<RawSearchResult>,
    /// Image entries are passed through untyped; the provider's shape for
    /// them varies with request options.
    #[serde(default)]
    pub images: Vec<Value>,
}

/// Errors that can occur during provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Timeout occurred")]
    Timeout,

    #[error("Provider error: {0}")]
    Other(String),
}

/// Seam between the search tools and the concrete web-search backend.
///
/// Tools depend on this trait so tests can substitute a scripted provider.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Issue exactly one search call with the assembled parameters
    async fn search(
        &self,
        request: &ProviderSearchRequest,
    ) -> Result<ProviderSearchResponse, ProviderError>;

    /// Human-readable provider name for logs
    fn name(&self) -> &str;
}
