//! Simple search tool: fixed parameters, no cache.
//!
//! The lightweight counterpart to [`EnhancedSearchTool`]. The query is the
//! only input; depth, result count, and the answer flag are fixed, and
//! snippets get a tighter budget.
//!
//! [`EnhancedSearchTool`]: super::search::EnhancedSearchTool

use super::{truncate_snippet, SearchOutcome, SourceItem, DEFAULT_RELEVANCE_SCORE};
use crate::client::{ProviderSearchRequest, ProviderSearchResponse, SearchProvider};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Snippet budget for the simple variant, in characters
const SNIPPET_BUDGET: usize = 300;

/// Fixed result count for the simple variant
const MAX_RESULTS: u32 = 5;

/// Simple search tool
#[derive(Clone)]
pub struct SimpleSearchTool {
    provider: Arc<dyn SearchProvider>,
}

impl std::fmt::Debug for SimpleSearchTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleSearchTool")
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl SimpleSearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }

    /// Execute a search with the fixed parameter set.
    ///
    /// Infallible by contract: provider failures are logged and converted to
    /// the fixed fallback outcome.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let request = ProviderSearchRequest {
            query: query.to_string(),
            search_depth: "advanced".to_string(),
            max_results: MAX_RESULTS,
            topic: None,
            days: None,
            include_answer: true,
            include_raw_content: false,
            include_images: false,
            include_domains: None,
            exclude_domains: None,
            // search language intentionally unset; the provider detects it
            // from the query
        };

        info!(query, "Calling search provider");

        match self.provider.search(&request).await {
            Ok(raw) => format_results(&raw),
            Err(e) => {
                error!(provider = self.provider.name(), error = %e, "Search error");
                SearchOutcome::fallback()
            }
        }
    }
}

/// Normalize the provider's raw response. Unlike the enhanced variant this
/// drops attribution fields and images and uses the tighter snippet budget.
fn format_results(raw: &ProviderSearchResponse) -> SearchOutcome {
    let mut sources = Vec::with_capacity(raw.results.len());
    let mut urls = Vec::new();

    for (idx, result) in raw.results.iter().enumerate() {
        sources.push(SourceItem {
            id: format!("source_{}", idx + 1),
            url: result.url.clone(),
            title: result.title.clone(),
            snippet: truncate_snippet(&result.content, SNIPPET_BUDGET),
            relevance_score: result.score.unwrap_or(DEFAULT_RELEVANCE_SCORE),
            published_date: None,
            author: None,
        });
        if !result.url.is_empty() {
            urls.push(result.url.clone());
        }
    }

    let total_results = sources.len();
    SearchOutcome {
        summary: raw.answer.clone().unwrap_or_default(),
        sources,
        urls,
        total_results,
        images: Vec::new(),
        from_cache: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ProviderError, RawSearchResult};
    use async_trait::async_trait;
    use serde_json::json;

    struct FixedProvider {
        response: Option<ProviderSearchResponse>,
        captured: std::sync::Mutex<Option<ProviderSearchRequest>>,
    }

    #[async_trait]
    impl SearchProvider for FixedProvider {
        async fn search(
            &self,
            request: &ProviderSearchRequest,
        ) -> Result<ProviderSearchResponse, ProviderError> {
            *self.captured.lock().unwrap() = Some(request.clone());
            self.response
                .clone()
                .ok_or_else(|| ProviderError::Network("down".to_string()))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn response_with_long_content() -> ProviderSearchResponse {
        ProviderSearchResponse {
            answer: None,
            results: vec![RawSearchResult {
                url: "https://example.com".to_string(),
                title: "T".to_string(),
                content: "x".repeat(350),
                score: None,
                published_date: Some("2024-05-05".to_string()),
                author: Some("a".to_string()),
            }],
            images: vec![json!("https://img/1")],
        }
    }

    #[tokio::test]
    async fn uses_fixed_parameters() {
        let provider = Arc::new(FixedProvider {
            response: Some(response_with_long_content()),
            captured: std::sync::Mutex::new(None),
        });
        let tool = SimpleSearchTool::new(provider.clone());
        tool.search("anything at all").await;

        let request = provider.captured.lock().unwrap().clone().unwrap();
        assert_eq!(request.search_depth, "advanced");
        assert_eq!(request.max_results, 5);
        assert!(request.include_answer);
        assert!(!request.include_raw_content);
        assert!(!request.include_images);
        assert!(request.topic.is_none());
        assert!(request.include_domains.is_none());
    }

    #[tokio::test]
    async fn truncates_to_300_and_drops_attribution_and_images() {
        let provider = Arc::new(FixedProvider {
            response: Some(response_with_long_content()),
            captured: std::sync::Mutex::new(None),
        });
        let tool = SimpleSearchTool::new(provider);
        let outcome = tool.search("q").await;

        assert_eq!(outcome.sources[0].snippet.chars().count(), 300);
        assert!(outcome.sources[0].snippet.ends_with("..."));
        assert!(outcome.sources[0].published_date.is_none());
        assert!(outcome.sources[0].author.is_none());
        assert!(outcome.images.is_empty());
        assert_eq!(outcome.summary, "");
    }

    #[tokio::test]
    async fn provider_failure_yields_fallback() {
        let provider = Arc::new(FixedProvider {
            response: None,
            captured: std::sync::Mutex::new(None),
        });
        let tool = SimpleSearchTool::new(provider);
        let outcome = tool.search("q").await;

        assert_eq!(outcome.summary, super::super::FALLBACK_SUMMARY);
        assert!(outcome.sources.is_empty());
        assert_eq!(outcome.total_results, 0);
    }
}
