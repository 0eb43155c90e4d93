pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::matching::handlers as matching;
use crate::profiles::handlers as profiles;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job board
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        .route("/api/v1/jobs/:id/viewer", get(jobs::handle_job_viewer_status))
        .route("/api/v1/jobs/:id/publish", post(jobs::handle_publish_job))
        .route("/api/v1/jobs/:id/apply", post(jobs::handle_apply))
        .route(
            "/api/v1/jobs/:id/save",
            post(jobs::handle_save_job).delete(jobs::handle_unsave_job),
        )
        .route(
            "/api/v1/jobs/:id/applications",
            get(jobs::handle_job_applications),
        )
        // Employer dashboard
        .route("/api/v1/employer/jobs", get(jobs::handle_employer_jobs))
        .route("/api/v1/employer/stats", get(jobs::handle_employer_stats))
        // Applications
        .route(
            "/api/v1/applications/:id/status",
            patch(jobs::handle_update_application_status),
        )
        .route(
            "/api/v1/applications/:id",
            delete(jobs::handle_withdraw_application),
        )
        .route("/api/v1/me/applications", get(jobs::handle_my_applications))
        .route("/api/v1/me/saved", get(jobs::handle_my_saved_jobs))
        // Profiles
        .route("/api/v1/profile", get(profiles::handle_get_profile))
        .route(
            "/api/v1/onboarding",
            post(profiles::handle_complete_onboarding),
        )
        .route(
            "/api/v1/onboarding/skip",
            post(profiles::handle_skip_onboarding),
        )
        // Recommendations
        .route(
            "/api/v1/recommendations",
            get(matching::handle_recommendations),
        )
        .with_state(state)
}
