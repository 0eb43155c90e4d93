//! Job enrichment: AI-generated tags and a bilingual summary, applied on publish.
//!
//! Pluggable like the rest of the LLM-backed pieces: `AppState` carries an
//! `Arc<dyn JobEnricher>`, chosen at startup. `LlmJobEnricher` asks the model;
//! `FallbackEnricher` (no API key) reuses the job's own skills and description.
//!
//! Policy: runs detached from the publish request, bounded by a timeout, never
//! retried. Success overwrites `ai_tags` / `ai_summary`; failure is logged and
//! the job keeps whatever it had.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::jobs::prompts::{enrich_prompt, EnrichPromptFields};
use crate::jobs::queries::fetch_job_by_id;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::job::JobRow;
use crate::models::LocalizedText;

/// Characters of each description kept as the fallback summary.
const FALLBACK_SUMMARY_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    pub ai_tags: Vec<String>,
    pub ai_summary: LocalizedText,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentOutcome {
    Applied { tags: usize },
    JobMissing,
    Failed(String),
}

#[async_trait]
pub trait JobEnricher: Send + Sync {
    async fn enrich(&self, job: &JobRow) -> Result<Enrichment, LlmError>;

    /// Backend label for logs.
    fn name(&self) -> &str;
}

// ────────────────────────────────────────────────────────────────────────────
// Backends
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmJobEnricher(pub LlmClient);

#[async_trait]
impl JobEnricher for LlmJobEnricher {
    async fn enrich(&self, job: &JobRow) -> Result<Enrichment, LlmError> {
        let raw: RawEnrichment = self.0.call_json(&build_prompt(job)).await?;
        Ok(raw.into())
    }

    fn name(&self) -> &str {
        "llm"
    }
}

pub struct FallbackEnricher;

#[async_trait]
impl JobEnricher for FallbackEnricher {
    async fn enrich(&self, job: &JobRow) -> Result<Enrichment, LlmError> {
        Ok(fallback_enrichment(job))
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

pub fn fallback_enrichment(job: &JobRow) -> Enrichment {
    Enrichment {
        ai_tags: job.skills_tags.clone(),
        ai_summary: job.description.truncated(FALLBACK_SUMMARY_CHARS),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Model output
// ────────────────────────────────────────────────────────────────────────────

/// Loosely-typed model output. Anything malformed degrades to empty values.
#[derive(Debug, Default, Deserialize)]
struct RawEnrichment {
    #[serde(default)]
    tags: Value,
    #[serde(default)]
    summary_en: Option<String>,
    #[serde(default)]
    summary_ar: Option<String>,
}

impl From<RawEnrichment> for Enrichment {
    fn from(raw: RawEnrichment) -> Self {
        let ai_tags = raw
            .tags
            .as_array()
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(|t| t.trim().to_lowercase())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Enrichment {
            ai_tags,
            ai_summary: LocalizedText::new(
                raw.summary_en.unwrap_or_default(),
                raw.summary_ar.unwrap_or_default(),
            ),
        }
    }
}

fn build_prompt(job: &JobRow) -> String {
    let skills = job.skills_tags.join(", ");
    enrich_prompt(&EnrichPromptFields {
        title_en: &job.title.en,
        title_ar: &job.title.ar,
        description_en: &job.description.en,
        description_ar: &job.description.ar,
        category: job.category.as_deref().unwrap_or("N/A"),
        skills: &skills,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestration
// ────────────────────────────────────────────────────────────────────────────

/// Fetches the job, enriches it within `timeout`, and stores the result.
pub async fn enrich_job(
    pool: &PgPool,
    enricher: &dyn JobEnricher,
    job_id: Uuid,
    timeout: Duration,
) -> EnrichmentOutcome {
    let job = match fetch_job_by_id(pool, job_id).await {
        Ok(Some(job)) => job,
        Ok(None) => return EnrichmentOutcome::JobMissing,
        Err(e) => return EnrichmentOutcome::Failed(format!("fetch failed: {e}")),
    };

    let enrichment = match tokio::time::timeout(timeout, enricher.enrich(&job)).await {
        Ok(Ok(enrichment)) => enrichment,
        Ok(Err(e)) => return EnrichmentOutcome::Failed(e.to_string()),
        Err(_) => return EnrichmentOutcome::Failed(LlmError::Timeout(timeout).to_string()),
    };

    let tags = enrichment.ai_tags.len();
    let stored = sqlx::query(
        "UPDATE jobs SET ai_tags = $1, ai_summary = $2, updated_at = NOW() WHERE id = $3",
    )
    .bind(enrichment.ai_tags.as_slice())
    .bind(Json(&enrichment.ai_summary))
    .bind(job_id)
    .execute(pool)
    .await;

    match stored {
        Ok(_) => EnrichmentOutcome::Applied { tags },
        Err(e) => EnrichmentOutcome::Failed(format!("update failed: {e}")),
    }
}

/// Runs `enrich_job` on a detached task. The handle is returned for tests and
/// shutdown hooks; request handlers drop it.
pub fn spawn_enrichment(
    pool: PgPool,
    enricher: Arc<dyn JobEnricher>,
    job_id: Uuid,
    timeout: Duration,
) -> JoinHandle<EnrichmentOutcome> {
    tokio::spawn(async move {
        let outcome = enrich_job(&pool, enricher.as_ref(), job_id, timeout).await;
        match &outcome {
            EnrichmentOutcome::Applied { tags } => info!(
                "Enriched job {job_id} via {} backend ({tags} tags)",
                enricher.name()
            ),
            EnrichmentOutcome::JobMissing => {
                warn!("Skipped enrichment: job {job_id} no longer exists")
            }
            EnrichmentOutcome::Failed(reason) => warn!(
                "Enrichment for job {job_id} via {} backend failed: {reason}",
                enricher.name()
            ),
        }
        outcome
    })
}
