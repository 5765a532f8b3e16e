pub mod search;
pub mod simple;

pub use search::EnhancedSearchTool;
pub use simple::SimpleSearchTool;

use serde::Serialize;
use serde_json::Value;

/// Summary shown when the provider call fails and no results are available
pub const FALLBACK_SUMMARY: &str = "検索結果を取得できませんでした。";

/// Normalized search result returned by both tool variants
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// Provider's AI-generated answer, empty when absent
    pub summary: String,
    pub sources: Vec<SourceItem>,
    pub urls: Vec<String>,
    pub total_results: usize,
    /// At most five image entries (enhanced variant only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Value>,
    /// Present (true) only on results served from the cache
    #[serde(skip_serializing_if = "is_false")]
    pub from_cache: bool,
}

/// One normalized source entry
#[derive(Debug, Clone, Serialize)]
pub struct SourceItem {
    pub id: String,
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub relevance_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl SearchOutcome {
    /// Fixed fallback returned when the provider call fails
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            summary: FALLBACK_SUMMARY.to_string(),
            sources: Vec::new(),
            urls: Vec::new(),
            total_results: 0,
            images: Vec::new(),
            from_cache: false,
        }
    }

    /// Empty outcome carrying an error summary, used in failure payloads
    #[must_use]
    pub fn empty_with_summary(summary: String) -> Self {
        Self {
            summary,
            ..Self::fallback()
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Truncate `content` to `budget` characters total, replacing the tail with
/// `"..."` when it exceeds the budget. Counts characters, not bytes, so
/// multi-byte text truncates cleanly.
#[must_use]
pub(crate) fn truncate_snippet(content: &str, budget: usize) -> String {
    if content.chars().count() <= budget {
        return content.to_string();
    }
    let mut truncated: String = content.chars().take(budget.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

/// Default relevance score when the provider omits one
pub(crate) const DEFAULT_RELEVANCE_SCORE: f64 = 0.5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_is_unchanged() {
        assert_eq!(truncate_snippet("short", 300), "short");
    }

    #[test]
    fn content_at_budget_is_unchanged() {
        let content = "a".repeat(300);
        assert_eq!(truncate_snippet(&content, 300), content);
    }

    #[test]
    fn long_content_truncates_to_exact_budget_with_ellipsis() {
        let content = "b".repeat(301);
        let truncated = truncate_snippet(&content, 300);
        assert_eq!(truncated.chars().count(), 300);
        assert!(truncated.ends_with("..."));
        assert!(truncated.starts_with("bbb"));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let content = "日".repeat(500);
        let truncated = truncate_snippet(&content, 400);
        assert_eq!(truncated.chars().count(), 400);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn fallback_shape() {
        let outcome = SearchOutcome::fallback();
        assert_eq!(outcome.summary, FALLBACK_SUMMARY);
        assert!(outcome.sources.is_empty());
        assert!(outcome.urls.is_empty());
        assert_eq!(outcome.total_results, 0);
        assert!(!outcome.from_cache);
    }

    #[test]
    fn from_cache_and_images_are_omitted_when_absent() {
        let json = serde_json::to_value(SearchOutcome::fallback()).unwrap();
        let map = json.as_object().unwrap();
        assert!(!map.contains_key("from_cache"));
        assert!(!map.contains_key("images"));
    }
}
