//! Write side of the job board, plus the caller-scoped professional views.
//!
//! Every action receives the caller's already-onboarded profile and checks the
//! role before touching the database. Ownership is enforced in SQL: a job that
//! exists but belongs to another employer is reported as not found.

use std::sync::Arc;
use std::time::Duration;

use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::require_role;
use crate::errors::AppError;
use crate::jobs::enrichment::{spawn_enrichment, JobEnricher};
use crate::jobs::queries::{
    fetch_job_by_id, fetch_my_applications, fetch_owned_job, fetch_saved_jobs,
};
use crate::jobs::validation::{ApplyInput, JobInput};
use crate::models::job::{
    ApplicationRow, ApplicationStatus, ApplicationWithJob, JobRow, JobStatus, SavedJobRow,
    SavedJobWithDetails,
};
use crate::models::profile::{ProfileRow, UserRole};

const JOB_NOT_FOUND: &str = "Job not found";
const APPLICATION_NOT_FOUND: &str = "Application not found";

pub async fn create_job(
    pool: &PgPool,
    profile: &ProfileRow,
    input: JobInput,
) -> Result<JobRow, AppError> {
    require_role(profile, UserRole::Employer, "Only employers can create jobs")?;
    let job = input.validate()?;

    let row = sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs
            (employer_id, title, description, category, budget, skills_tags, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(profile.id)
    .bind(Json(&job.title))
    .bind(Json(&job.description))
    .bind(job.category.as_deref())
    .bind(job.budget)
    .bind(job.skills_tags.as_slice())
    .bind(job.status.as_str())
    .fetch_one(pool)
    .await?;

    info!("Employer {} created job {} ({})", profile.id, row.id, row.status);
    Ok(row)
}

pub async fn update_job(
    pool: &PgPool,
    profile: &ProfileRow,
    job_id: Uuid,
    input: JobInput,
) -> Result<JobRow, AppError> {
    require_role(profile, UserRole::Employer, "Only employers can update jobs")?;
    let job = input.validate()?;

    sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs
        SET title = $1, description = $2, category = $3, budget = $4,
            skills_tags = $5, status = $6, updated_at = NOW()
        WHERE id = $7 AND employer_id = $8
        RETURNING *
        "#,
    )
    .bind(Json(&job.title))
    .bind(Json(&job.description))
    .bind(job.category.as_deref())
    .bind(job.budget)
    .bind(job.skills_tags.as_slice())
    .bind(job.status.as_str())
    .bind(job_id)
    .bind(profile.id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(JOB_NOT_FOUND.into()))
}

pub async fn delete_job(pool: &PgPool, profile: &ProfileRow, job_id: Uuid) -> Result<(), AppError> {
    require_role(profile, UserRole::Employer, "Only employers can delete jobs")?;

    let result = sqlx::query("DELETE FROM jobs WHERE id = $1 AND employer_id = $2")
        .bind(job_id)
        .bind(profile.id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(JOB_NOT_FOUND.into()));
    }
    info!("Employer {} deleted job {job_id}", profile.id);
    Ok(())
}

/// Where a publish toggle sends its enrichment work.
pub struct EnrichmentTarget<'a> {
    pub enricher: &'a Arc<dyn JobEnricher>,
    pub timeout: Duration,
}

/// Publishing sets the job open and kicks off enrichment in the background;
/// unpublishing sets it back to draft. The response never waits on enrichment.
pub async fn toggle_job_publish(
    pool: &PgPool,
    profile: &ProfileRow,
    job_id: Uuid,
    publish: bool,
    enrichment: EnrichmentTarget<'_>,
) -> Result<JobRow, AppError> {
    require_role(profile, UserRole::Employer, "Only employers can publish jobs")?;

    let status = if publish {
        JobStatus::Open
    } else {
        JobStatus::Draft
    };

    let job = sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs SET status = $1, updated_at = NOW()
        WHERE id = $2 AND employer_id = $3
        RETURNING *
        "#,
    )
    .bind(status.as_str())
    .bind(job_id)
    .bind(profile.id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(JOB_NOT_FOUND.into()))?;

    if publish {
        spawn_enrichment(
            pool.clone(),
            Arc::clone(enrichment.enricher),
            job.id,
            enrichment.timeout,
        );
    }

    info!("Job {job_id} is now {status}");
    Ok(job)
}

pub async fn apply_to_job(
    pool: &PgPool,
    profile: &ProfileRow,
    job_id: Uuid,
    input: ApplyInput,
) -> Result<ApplicationRow, AppError> {
    require_role(profile, UserRole::Professional, "Only professionals can apply to jobs")?;
    let cover_letter = input.validate()?;

    let job = fetch_job_by_id(pool, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(JOB_NOT_FOUND.into()))?;
    if !job.is_open() {
        return Err(AppError::Validation(
            "This job is not accepting applications".into(),
        ));
    }

    let application = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (job_id, applicant_id, cover_letter, status)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(job_id)
    .bind(profile.id)
    .bind(cover_letter)
    .bind(ApplicationStatus::Pending.as_str())
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::on_unique_violation(e, "You have already applied to this job"))?;

    info!("Professional {} applied to job {job_id}", profile.id);
    Ok(application)
}

pub async fn update_application_status(
    pool: &PgPool,
    profile: &ProfileRow,
    application_id: Uuid,
    status: ApplicationStatus,
) -> Result<ApplicationRow, AppError> {
    require_role(
        profile,
        UserRole::Employer,
        "Only employers can update application status",
    )?;

    let application =
        sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
            .bind(application_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(APPLICATION_NOT_FOUND.into()))?;

    if fetch_owned_job(pool, application.job_id, profile.id).await?.is_none() {
        return Err(AppError::Forbidden(
            "You can only update applications for your own jobs".into(),
        ));
    }

    let updated = sqlx::query_as::<_, ApplicationRow>(
        "UPDATE applications SET status = $1 WHERE id = $2 RETURNING *",
    )
    .bind(status.as_str())
    .bind(application_id)
    .fetch_one(pool)
    .await?;

    Ok(updated)
}

pub async fn save_job(
    pool: &PgPool,
    profile: &ProfileRow,
    job_id: Uuid,
) -> Result<SavedJobRow, AppError> {
    if fetch_job_by_id(pool, job_id).await?.is_none() {
        return Err(AppError::NotFound(JOB_NOT_FOUND.into()));
    }

    sqlx::query_as::<_, SavedJobRow>(
        "INSERT INTO saved_jobs (job_id, user_id) VALUES ($1, $2) RETURNING *",
    )
    .bind(job_id)
    .bind(profile.id)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::on_unique_violation(e, "Job already saved"))
}

/// Idempotent: unsaving a job that was never saved is not an error.
pub async fn unsave_job(pool: &PgPool, profile: &ProfileRow, job_id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM saved_jobs WHERE job_id = $1 AND user_id = $2")
        .bind(job_id)
        .bind(profile.id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn withdraw_application(
    pool: &PgPool,
    profile: &ProfileRow,
    application_id: Uuid,
) -> Result<(), AppError> {
    require_role(
        profile,
        UserRole::Professional,
        "Only professionals can withdraw applications",
    )?;

    let result = sqlx::query("DELETE FROM applications WHERE id = $1 AND applicant_id = $2")
        .bind(application_id)
        .bind(profile.id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(APPLICATION_NOT_FOUND.into()));
    }
    Ok(())
}

pub async fn my_applications(
    pool: &PgPool,
    profile: &ProfileRow,
) -> Result<Vec<ApplicationWithJob>, AppError> {
    require_role(profile, UserRole::Professional, "Only professionals have applications")?;
    Ok(fetch_my_applications(pool, profile.id).await?)
}

pub async fn my_saved_jobs(
    pool: &PgPool,
    profile: &ProfileRow,
) -> Result<Vec<SavedJobWithDetails>, AppError> {
    require_role(profile, UserRole::Professional, "Only professionals have saved jobs")?;
    Ok(fetch_saved_jobs(pool, profile.id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::enrichment::FallbackEnricher;
    use crate::models::profile::fixtures::make_profile;
    use sqlx::postgres::PgPoolOptions;

    // Role checks run before any query, so a pool that never connects is enough.
    fn unreachable_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://marketplace@127.0.0.1:1/unused")
            .unwrap()
    }

    fn job_input() -> JobInput {
        serde_json::from_value(serde_json::json!({
            "title_en": "Data Engineer",
            "title_ar": "مهندس بيانات",
            "description_en": "Pipelines",
            "description_ar": "خطوط بيانات",
            "skills_tags": ["python"]
        }))
        .unwrap()
    }

    fn forbidden_message(err: AppError) -> String {
        match err {
            AppError::Forbidden(msg) => msg,
            other => panic!("expected forbidden, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_professional_cannot_manage_jobs() {
        let pool = unreachable_pool();
        let pro = make_profile(Some(UserRole::Professional), true);
        let job_id = Uuid::new_v4();

        let err = create_job(&pool, &pro, job_input()).await.unwrap_err();
        assert_eq!(forbidden_message(err), "Only employers can create jobs");

        let err = update_job(&pool, &pro, job_id, job_input()).await.unwrap_err();
        assert_eq!(forbidden_message(err), "Only employers can update jobs");

        let err = delete_job(&pool, &pro, job_id).await.unwrap_err();
        assert_eq!(forbidden_message(err), "Only employers can delete jobs");
    }

    #[tokio::test]
    async fn test_professional_cannot_publish() {
        let pool = unreachable_pool();
        let pro = make_profile(Some(UserRole::Professional), true);
        let enricher: Arc<dyn JobEnricher> = Arc::new(FallbackEnricher);

        let err = toggle_job_publish(
            &pool,
            &pro,
            Uuid::new_v4(),
            true,
            EnrichmentTarget {
                enricher: &enricher,
                timeout: Duration::from_secs(1),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(forbidden_message(err), "Only employers can publish jobs");
    }

    #[tokio::test]
    async fn test_employer_cannot_apply_or_withdraw() {
        let pool = unreachable_pool();
        let employer = make_profile(Some(UserRole::Employer), true);

        let err = apply_to_job(&pool, &employer, Uuid::new_v4(), ApplyInput::default())
            .await
            .unwrap_err();
        assert_eq!(forbidden_message(err), "Only professionals can apply to jobs");

        let err = withdraw_application(&pool, &employer, Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(
            forbidden_message(err),
            "Only professionals can withdraw applications"
        );
    }

    #[tokio::test]
    async fn test_professional_cannot_review_applications() {
        let pool = unreachable_pool();
        let pro = make_profile(Some(UserRole::Professional), true);

        let err = update_application_status(&pool, &pro, Uuid::new_v4(), ApplicationStatus::Accepted)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_employer_has_no_professional_views() {
        let pool = unreachable_pool();
        let employer = make_profile(Some(UserRole::Employer), true);

        let err = my_applications(&pool, &employer).await.unwrap_err();
        assert_eq!(forbidden_message(err), "Only professionals have applications");

        let err = my_saved_jobs(&pool, &employer).await.unwrap_err();
        assert_eq!(forbidden_message(err), "Only professionals have saved jobs");
    }

    #[tokio::test]
    async fn test_invalid_job_rejected_before_insert() {
        let pool = unreachable_pool();
        let employer = make_profile(Some(UserRole::Employer), true);
        let mut input = job_input();
        input.title_en = "  ".to_string();

        let err = create_job(&pool, &employer, input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "English title is required"));
    }

    #[tokio::test]
    async fn test_long_cover_letter_rejected_before_lookup() {
        let pool = unreachable_pool();
        let pro = make_profile(Some(UserRole::Professional), true);
        let input = ApplyInput {
            cover_letter: Some("x".repeat(5001)),
        };

        let err = apply_to_job(&pool, &pro, Uuid::new_v4(), input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
