//! Enhanced search tool: full parameter set, query heuristics, and the
//! response cache.

use super::{truncate_snippet, SearchOutcome, SourceItem, DEFAULT_RELEVANCE_SCORE};
use crate::cache::{fingerprint, ResponseCache};
use crate::client::{ProviderSearchRequest, ProviderSearchResponse, SearchProvider};
use crate::config::Config;
use crate::event::{param_as_string, SearchParams};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Snippet budget for the enhanced variant, in characters
const SNIPPET_BUDGET: usize = 400;

/// Maximum number of image entries carried in the outcome
const MAX_IMAGES: usize = 5;

/// Queries about volatile numeric facts get a lighter search; a shallow
/// lookup is enough for odds, prices, and rates, and these override any
/// caller-supplied depth.
const VOLATILE_FACT_KEYWORDS: [&str; 6] = ["odds", "price", "rate", "オッズ", "価格", "倍率"];

/// Enhanced search tool with caching
#[derive(Clone)]
pub struct EnhancedSearchTool {
    provider: Arc<dyn SearchProvider>,
    cache: Arc<ResponseCache<SearchOutcome>>,
    config: Arc<Config>,
}

impl std::fmt::Debug for EnhancedSearchTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnhancedSearchTool")
            .field("provider", &self.provider.name())
            .field("cache", &"ResponseCache")
            .field("config", &"Config")
            .finish()
    }
}

impl EnhancedSearchTool {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        cache: Arc<ResponseCache<SearchOutcome>>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            provider,
            cache,
            config,
        }
    }

    /// Execute a search for the extracted parameters.
    ///
    /// Infallible by contract: any provider failure is logged and converted
    /// to the fixed fallback outcome. Fresh results are cached; cached hits
    /// come back with the `from_cache` marker set.
    #[instrument(skip(self, params), fields(query = %param_as_string(params, "query").unwrap_or_default()))]
    pub async fn search(&self, params: &SearchParams) -> SearchOutcome {
        let key = fingerprint(params);

        if let Some(mut cached) = self.cache.lookup(&key).await {
            info!(
                query = %param_as_string(params, "query").unwrap_or_default(),
                "Cache hit for query"
            );
            cached.from_cache = true;
            return cached;
        }

        let request = self.build_request(params);
        debug!(?request, "Assembled provider request");

        let raw = match self.provider.search(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(provider = self.provider.name(), error = %e, "Search error");
                return SearchOutcome::fallback();
            }
        };

        let outcome = format_results(&raw);
        self.cache.store(&key, outcome.clone()).await;
        outcome
    }

    /// Assemble the provider request from extracted parameters, applying
    /// defaults and the volatile-fact heuristic
    fn build_request(&self, params: &SearchParams) -> ProviderSearchRequest {
        let query = param_as_string(params, "query").unwrap_or_default();
        let query_lower = query.to_lowercase();

        let (search_depth, max_results) = if VOLATILE_FACT_KEYWORDS
            .iter()
            .any(|keyword| query_lower.contains(keyword))
        {
            ("basic".to_string(), 3)
        } else {
            let depth = param_as_string(params, "search_depth")
                .unwrap_or_else(|| self.config.search.default_search_depth.clone());
            let max = param_as_string(params, "max_results")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(self.config.search.default_max_results);
            (depth, max)
        };

        let days = param_as_string(params, "days")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|days| *days != 0);

        ProviderSearchRequest {
            query,
            search_depth,
            max_results,
            topic: param_as_string(params, "topic"),
            days,
            include_answer: param_bool(params, "include_answer", true),
            include_raw_content: param_bool(params, "include_raw_content", false),
            include_images: param_bool(params, "include_images", false),
            include_domains: param_domains(params, "include_domains"),
            exclude_domains: param_domains(params, "exclude_domains"),
        }
    }
}

/// Normalize the provider's raw response, carrying attribution fields and up
/// to five images
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
            published_date: result.published_date.clone(),
            author: result.author.clone(),
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
        images: raw.images.iter().take(MAX_IMAGES).cloned().collect(),
        from_cache: false,
    }
}

/// A parameter is truthy iff its stringified form case-insensitively equals
/// "true"
fn param_bool(params: &SearchParams, key: &str, default: bool) -> bool {
    match params.get(key) {
        None | Some(Value::Null) => default,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        Some(_) => false,
    }
}

/// Accept a domain list either as an array or a comma-separated string;
/// omit the key entirely when nothing usable remains
fn param_domains(params: &SearchParams, key: &str) -> Option<Vec<String>> {
    let domains: Vec<String> = match params.get(key)? {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(csv) => csv
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    };

    if domains.is_empty() {
        None
    } else {
        Some(domains)
    }
}
