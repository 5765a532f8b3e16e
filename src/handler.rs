//! Top-level invocation handlers.
//!
//! One handler per gateway variant. Both follow the same sequence -
//! credential check, parameter extraction, validation, search, envelope -
//! and both are total: every path, including unexpected internal errors,
//! returns a well-formed [`ResponseEnvelope`].

use crate::cache::ResponseCache;
use crate::client::{SearchProvider, TavilyClient};
use crate::config::Config;
use crate::envelope::{ResponseEnvelope, ResultPayload};
use crate::event::{extract_all_parameters, extract_query, param_as_string};
use crate::tools::{EnhancedSearchTool, SimpleSearchTool};
use crate::Result;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument};

/// Error message reported when the provider credential is missing
const CONFIGURATION_ERROR: &str = "Configuration error";

/// Error message reported when no query can be extracted
const QUERY_REQUIRED: &str = "Query parameter required";

/// Handler for the enhanced variant: full parameter set plus response cache
#[derive(Debug, Clone)]
pub struct EnhancedSearchHandler {
    tool: Option<EnhancedSearchTool>,
}

impl EnhancedSearchHandler {
    /// Build the handler from configuration.
    ///
    /// A missing API key does not fail construction; the handler reports a
    /// configuration error per invocation instead, so a misconfigured
    /// deployment still answers with well-formed envelopes.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let tool = match config.provider.api_key.clone() {
            Some(api_key) => {
                let provider: Arc<dyn SearchProvider> =
                    Arc::new(TavilyClient::new(&config, api_key)?);
                Some(Self::build_tool(provider, config))
            }
            None => None,
        };
        Ok(Self { tool })
    }

    /// Build the handler around an explicit provider (test seam)
    #[must_use]
    pub fn with_provider(provider: Arc<dyn SearchProvider>, config: Arc<Config>) -> Self {
        Self {
            tool: Some(Self::build_tool(provider, config)),
        }
    }

    fn build_tool(provider: Arc<dyn SearchProvider>, config: Arc<Config>) -> EnhancedSearchTool {
        let cache = Arc::new(ResponseCache::new(config.cache_ttl()));
        EnhancedSearchTool::new(provider, cache, config)
    }

    /// Handle one invocation event. Never fails.
    #[instrument(skip(self, event))]
    pub async fn handle(&self, event: &Value) -> ResponseEnvelope {
        let start = Instant::now();

        let Some(tool) = &self.tool else {
            error!("TAVILY_API_KEY not found");
            return self.error_envelope(event, CONFIGURATION_ERROR.to_string());
        };

        let params = extract_all_parameters(event);
        let Some(query) = param_as_string(&params, "query") else {
            return self.error_envelope(event, QUERY_REQUIRED.to_string());
        };

        info!(query = %query, params = %serde_json::to_string(&params).unwrap_or_default(),
              "Processing query");

        let outcome = tool.search(&params).await;

        let processing_time = start.elapsed().as_secs_f64();
        info!("Search completed in {processing_time:.2} seconds");

        ResponseEnvelope::wrap(
            event,
            &ResultPayload::success(query, processing_time, outcome),
        )
    }

    fn error_envelope(&self, event: &Value, message: String) -> ResponseEnvelope {
        let params = extract_all_parameters(event);
        let query = param_as_string(&params, "query").unwrap_or_default();
        ResponseEnvelope::wrap(event, &ResultPayload::failure(query, message))
    }
}

/// Handler for the simple variant: legacy query extraction, fixed
/// parameters, no cache
#[derive(Debug, Clone)]
pub struct SimpleSearchHandler {
    tool: Option<SimpleSearchTool>,
}

impl SimpleSearchHandler {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let tool = match config.provider.api_key.clone() {
            Some(api_key) => {
                let provider: Arc<dyn SearchProvider> =
                    Arc::new(TavilyClient::new(&config, api_key)?);
                Some(SimpleSearchTool::new(provider))
            }
            None => None,
        };
        Ok(Self { tool })
    }

    /// Build the handler around an explicit provider (test seam)
    #[must_use]
    pub fn with_provider(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            tool: Some(SimpleSearchTool::new(provider)),
        }
    }

    /// Handle one invocation event. Never fails.
    #[instrument(skip(self, event))]
    pub async fn handle(&self, event: &Value) -> ResponseEnvelope {
        let start = Instant::now();

        let Some(tool) = &self.tool else {
            error!("TAVILY_API_KEY not found");
            return Self::error_envelope(event, CONFIGURATION_ERROR.to_string());
        };

        let Some(query) = extract_query(event) else {
            return Self::error_envelope(event, QUERY_REQUIRED.to_string());
        };

        info!(query = %query, "Processing query");

        let outcome = tool.search(&query).await;

        let processing_time = start.elapsed().as_secs_f64();
        info!("Search completed in {processing_time:.2} seconds");

        ResponseEnvelope::wrap(
            event,
            &ResultPayload::success(query, processing_time, outcome),
        )
    }

    fn error_envelope(event: &Value, message: String) -> ResponseEnvelope {
        let query = extract_query(event).unwrap_or_default();
        ResponseEnvelope::wrap(event, &ResultPayload::failure(query, message))
    }
}
