use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use marketplace::config::Config;
use marketplace::db::create_pool;
use marketplace::jobs::enrichment::{FallbackEnricher, JobEnricher, LlmJobEnricher};
use marketplace::llm_client::{self, LlmClient};
use marketplace::routes::build_router;
use marketplace::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting marketplace API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs pending migrations)
    let db = create_pool(&config.database_url).await?;

    let enricher = build_enricher(&config)?;
    info!("Job enrichment backend: {}", enricher.name());

    let state = AppState {
        db,
        config: config.clone(),
        enricher,
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// LLM-backed enrichment when an API key is configured, otherwise the
/// tag/description fallback.
fn build_enricher(config: &Config) -> Result<Arc<dyn JobEnricher>> {
    match &config.openai_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone(), config.enrichment_timeout())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Ok(Arc::new(LlmJobEnricher(client)))
        }
        None => {
            warn!("OPENAI_API_KEY not set; jobs will be enriched from their own skills and description");
            Ok(Arc::new(FallbackEnricher))
        }
    }
}
