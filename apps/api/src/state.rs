use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::jobs::enrichment::JobEnricher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Pluggable job enricher. `LlmJobEnricher` when OPENAI_API_KEY is set,
    /// `FallbackEnricher` otherwise.
    pub enricher: Arc<dyn JobEnricher>,
}
