pub mod cache;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod event;
pub mod handler;
pub mod tools;

pub use cache::{fingerprint, ResponseCache};
pub use client::{ProviderSearchRequest, ProviderSearchResponse, SearchProvider, TavilyClient};
pub use config::{Config, ConfigOverrides};
pub use envelope::{ResponseEnvelope, ResultPayload};
pub use error::{Error, Result};
pub use event::{extract_all_parameters, extract_query, SearchParams};
pub use handler::{EnhancedSearchHandler, SimpleSearchHandler};
pub use tools::{EnhancedSearchTool, SearchOutcome, SimpleSearchTool, SourceItem};
