use axum::{extract::State, Json};

use crate::auth::{load_profile, AuthUser};
use crate::errors::AppError;
use crate::models::profile::ProfileRow;
use crate::profiles::onboarding::{complete_onboarding, skip_onboarding, OnboardingRequest};
use crate::state::AppState;

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileRow>, AppError> {
    Ok(Json(load_profile(&state.db, &user).await?))
}

/// POST /api/v1/onboarding
pub async fn handle_complete_onboarding(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<OnboardingRequest>,
) -> Result<Json<ProfileRow>, AppError> {
    let profile = load_profile(&state.db, &user).await?;
    let updated = complete_onboarding(&state.db, &profile, req).await?;
    Ok(Json(updated))
}

/// POST /api/v1/onboarding/skip
pub async fn handle_skip_onboarding(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileRow>, AppError> {
    let profile = load_profile(&state.db, &user).await?;
    let updated = skip_onboarding(&state.db, &profile).await?;
    Ok(Json(updated))
}
