use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{require_onboarding, require_role, AuthUser};
use crate::errors::AppError;
use crate::jobs::actions::{self, EnrichmentTarget};
use crate::jobs::queries::{self, JobStats};
use crate::jobs::validation::{
    ApplicationStatusInput, ApplyInput, JobInput, JobSearchParams, PublishInput,
};
use crate::models::job::{
    ApplicationRow, ApplicationWithApplicant, ApplicationWithJob, EmployerJobRow, JobRow,
    JobStatus, JobWithEmployer, SavedJobRow, SavedJobWithDetails,
};
use crate::models::profile::UserRole;
use crate::state::AppState;

#[derive(Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobRow>,
    pub page: i64,
    pub limit: i64,
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobSearchParams>,
) -> Result<Json<JobListResponse>, AppError> {
    let filters = params.validate()?;
    let jobs = queries::fetch_public_jobs(&state.db, &filters).await?;
    Ok(Json(JobListResponse {
        jobs,
        page: filters.offset / filters.limit + 1,
        limit: filters.limit,
    }))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobWithEmployer>, AppError> {
    let job = queries::fetch_job_with_employer(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    ensure_public(&job.job)?;
    Ok(Json(job))
}

/// Only open jobs are visible without ownership; drafts and closed jobs read
/// as missing. Owners see their own through the employer dashboard.
pub fn ensure_public(job: &JobRow) -> Result<(), AppError> {
    if job.is_open() {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("Job {} not found", job.id)))
    }
}

#[derive(Serialize)]
pub struct JobViewerStatus {
    pub has_applied: bool,
    pub has_saved: bool,
}

/// GET /api/v1/jobs/:id/viewer
/// Whether the caller already applied to / saved this job.
pub async fn handle_job_viewer_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<JobViewerStatus>, AppError> {
    Ok(Json(JobViewerStatus {
        has_applied: queries::has_applied_to_job(&state.db, id, user.user_id).await?,
        has_saved: queries::has_saved_job(&state.db, id, user.user_id).await?,
    }))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<JobInput>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let profile = require_onboarding(&state.db, &user).await?;
    let job = actions::create_job(&state.db, &profile, req).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// PUT /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<JobInput>,
) -> Result<Json<JobRow>, AppError> {
    let profile = require_onboarding(&state.db, &user).await?;
    let job = actions::update_job(&state.db, &profile, id, req).await?;
    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let profile = require_onboarding(&state.db, &user).await?;
    actions::delete_job(&state.db, &profile, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/jobs/:id/publish
pub async fn handle_publish_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<PublishInput>,
) -> Result<Json<JobRow>, AppError> {
    let profile = require_onboarding(&state.db, &user).await?;
    let job = actions::toggle_job_publish(
        &state.db,
        &profile,
        id,
        req.publish,
        EnrichmentTarget {
            enricher: &state.enricher,
            timeout: state.config.enrichment_timeout(),
        },
    )
    .await?;
    Ok(Json(job))
}

/// POST /api/v1/jobs/:id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ApplyInput>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    let profile = require_onboarding(&state.db, &user).await?;
    let application = actions::apply_to_job(&state.db, &profile, id, req).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// POST /api/v1/jobs/:id/save
pub async fn handle_save_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SavedJobRow>), AppError> {
    let profile = require_onboarding(&state.db, &user).await?;
    let saved = actions::save_job(&state.db, &profile, id).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// DELETE /api/v1/jobs/:id/save
pub async fn handle_unsave_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let profile = require_onboarding(&state.db, &user).await?;
    actions::unsave_job(&state.db, &profile, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/jobs/:id/applications
pub async fn handle_job_applications(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ApplicationWithApplicant>>, AppError> {
    let profile = require_onboarding(&state.db, &user).await?;
    require_role(&profile, UserRole::Employer, "Only employers can view applications")?;

    if queries::fetch_owned_job(&state.db, id, profile.id).await?.is_none() {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }

    let applications = queries::fetch_applications_for_job(&state.db, id).await?;
    Ok(Json(applications))
}

#[derive(Deserialize)]
pub struct EmployerJobsQuery {
    pub status: Option<JobStatus>,
}

/// GET /api/v1/employer/jobs
pub async fn handle_employer_jobs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<EmployerJobsQuery>,
) -> Result<Json<Vec<EmployerJobRow>>, AppError> {
    let profile = require_onboarding(&state.db, &user).await?;
    require_role(&profile, UserRole::Employer, "Only employers have a job dashboard")?;

    let jobs = queries::fetch_employer_jobs(&state.db, profile.id, params.status).await?;
    Ok(Json(jobs))
}

/// GET /api/v1/employer/stats
pub async fn handle_employer_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<JobStats>, AppError> {
    let profile = require_onboarding(&state.db, &user).await?;
    require_role(&profile, UserRole::Employer, "Only employers have job statistics")?;

    let stats = queries::employer_job_stats(&state.db, profile.id).await?;
    Ok(Json(stats))
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_application_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ApplicationStatusInput>,
) -> Result<Json<ApplicationRow>, AppError> {
    let profile = require_onboarding(&state.db, &user).await?;
    let application = actions::update_application_status(&state.db, &profile, id, req.status).await?;
    Ok(Json(application))
}

/// DELETE /api/v1/applications/:id
pub async fn handle_withdraw_application(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let profile = require_onboarding(&state.db, &user).await?;
    actions::withdraw_application(&state.db, &profile, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/me/applications
pub async fn handle_my_applications(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ApplicationWithJob>>, AppError> {
    let profile = require_onboarding(&state.db, &user).await?;
    let applications = actions::my_applications(&state.db, &profile).await?;
    Ok(Json(applications))
}

/// GET /api/v1/me/saved
pub async fn handle_my_saved_jobs(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<SavedJobWithDetails>>, AppError> {
    let profile = require_onboarding(&state.db, &user).await?;
    let saved = actions::my_saved_jobs(&state.db, &profile).await?;
    Ok(Json(saved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::fixtures::make_job;

    #[test]
    fn test_open_job_is_public() {
        let job = make_job(&["rust"], &[]);
        assert!(ensure_public(&job).is_ok());
    }

    #[test]
    fn test_draft_and_closed_jobs_are_hidden() {
        for status in [JobStatus::Draft, JobStatus::Closed] {
            let mut job = make_job(&["rust"], &[]);
            job.status = status.as_str().to_string();
            assert!(matches!(ensure_public(&job), Err(AppError::NotFound(_))));
        }
    }
}
