use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tavily_search_gateway::envelope::{ResponseEnvelope, ResultPayload};
use tavily_search_gateway::{Config, ConfigOverrides, EnhancedSearchHandler, SimpleSearchHandler};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Tavily search gateway: handles one agent tool-invocation event and
/// prints the response envelope on stdout.
#[derive(Debug, Parser)]
#[command(name = "tavily-search-gateway", version, about)]
struct Cli {
    /// Path to the invocation event JSON; reads stdin when omitted
    event: Option<PathBuf>,

    /// Use the simple variant (legacy query extraction, fixed parameters,
    /// no cache)
    #[arg(long)]
    simple: bool,

    /// Path to a TOML config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tavily API key override (normally taken from TAVILY_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Tavily endpoint override
    #[arg(long)]
    endpoint: Option<String>,

    /// Outbound request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Pretty-print the response envelope
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the envelope on stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        config_path: cli.config.clone(),
        api_key: cli.api_key.clone(),
        endpoint: cli.endpoint.clone(),
        timeout_secs: cli.timeout_secs,
    };
    let config = Arc::new(Config::load_with_overrides(&overrides)?);

    let event = read_event(cli.event.as_deref())?;

    let envelope = dispatch(&config, cli.simple, &event).await;

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    println!("{rendered}");

    Ok(())
}

/// Run the selected handler variant. Handler construction failures are
/// converted to an error envelope here so the process always emits one.
async fn dispatch(config: &Arc<Config>, simple: bool, event: &Value) -> ResponseEnvelope {
    if simple {
        match SimpleSearchHandler::new(Arc::clone(config)) {
            Ok(handler) => handler.handle(event).await,
            Err(e) => {
                error!(error = %e, "Failed to initialize simple handler");
                ResponseEnvelope::wrap(event, &ResultPayload::failure(String::new(), e.to_string()))
            }
        }
    } else {
        match EnhancedSearchHandler::new(Arc::clone(config)) {
            Ok(handler) => handler.handle(event).await,
            Err(e) => {
                error!(error = %e, "Failed to initialize enhanced handler");
                ResponseEnvelope::wrap(event, &ResultPayload::failure(String::new(), e.to_string()))
            }
        }
    }
}

fn read_event(path: Option<&std::path::Path>) -> anyhow::Result<Value> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read event file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read event from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("event is not valid JSON")
}
