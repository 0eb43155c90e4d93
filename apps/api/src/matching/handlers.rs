use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use crate::auth::{require_onboarding, require_role, AuthUser};
use crate::errors::AppError;
use crate::jobs::queries::fetch_public_jobs;
use crate::jobs::validation::JobFilters;
use crate::matching::{rank, ScoredItem};
use crate::models::job::JobRow;
use crate::models::profile::{ProfileRow, UserRole};
use crate::state::AppState;

/// Open jobs considered per request.
const CATALOG_SIZE: i64 = 100;
const MAX_LIMIT: usize = 100;

#[derive(Deserialize)]
pub struct RecommendationQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<ScoredItem<JobRow>>,
    pub skills: Vec<String>,
}

/// Resolves the requested page size: default from config, must be positive,
/// silently capped.
pub fn resolve_limit(requested: Option<usize>, default: usize) -> Result<usize, AppError> {
    match requested {
        Some(0) => Err(AppError::Validation("limit must be at least 1".into())),
        Some(n) => Ok(n.min(MAX_LIMIT)),
        None => Ok(default.min(MAX_LIMIT)),
    }
}

/// GET /api/v1/recommendations
///
/// Ranks the newest open jobs against the caller's profile skills. A profile
/// with no skills gets an empty list, not an error.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<RecommendationQuery>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let limit = resolve_limit(params.limit, state.config.recommendation_limit)?;
    let profile = require_onboarding(&state.db, &user).await?;
    let recommendations = recommend_jobs(&state.db, &profile, limit).await?;

    Ok(Json(RecommendationResponse {
        recommendations,
        skills: profile.skills,
    }))
}

/// Ranks the newest open jobs against a professional's skills.
pub async fn recommend_jobs(
    pool: &PgPool,
    profile: &ProfileRow,
    limit: usize,
) -> Result<Vec<ScoredItem<JobRow>>, AppError> {
    require_role(
        profile,
        UserRole::Professional,
        "Only professionals receive job recommendations",
    )?;

    let catalog = fetch_public_jobs(pool, &JobFilters::first(CATALOG_SIZE)).await?;
    let catalog_size = catalog.len();
    let recommendations = rank(profile.skills.as_slice(), catalog, limit);

    info!(
        "Recommended {} of {catalog_size} open jobs for {} ({} skills)",
        recommendations.len(),
        profile.id,
        profile.skills.len()
    );
    Ok(recommendations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::DEFAULT_LIMIT;
    use crate::models::profile::fixtures::make_profile;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn test_employer_gets_no_recommendations() {
        // The role check runs before the catalog query, so the pool never connects.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://marketplace@127.0.0.1:1/unused")
            .unwrap();
        let employer = make_profile(Some(UserRole::Employer), true);

        let err = recommend_jobs(&pool, &employer, DEFAULT_LIMIT).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Forbidden(msg) if msg == "Only professionals receive job recommendations"
        ));
    }

    #[test]
    fn test_resolve_limit_defaults() {
        assert_eq!(resolve_limit(None, DEFAULT_LIMIT).unwrap(), 20);
        assert_eq!(resolve_limit(None, 500).unwrap(), MAX_LIMIT);
    }

    #[test]
    fn test_resolve_limit_caps_and_rejects_zero() {
        assert_eq!(resolve_limit(Some(5), DEFAULT_LIMIT).unwrap(), 5);
        assert_eq!(resolve_limit(Some(1_000), DEFAULT_LIMIT).unwrap(), MAX_LIMIT);
        assert!(matches!(
            resolve_limit(Some(0), DEFAULT_LIMIT),
            Err(AppError::Validation(_))
        ));
    }
}
