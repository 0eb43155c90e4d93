//! Read side of the job board. Every function takes the pool explicitly.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::jobs::validation::JobFilters;
use crate::models::job::{
    ApplicationApplicantRow, ApplicationJobRow, ApplicationWithApplicant, ApplicationWithJob,
    EmployerJobRow, EmployerSummary, JobRow, JobStatus, JobWithEmployer, SavedJobRow,
    SavedJobWithDetails,
};

/// Open jobs for the public board, newest first.
///
/// Category, budget range and tag overlap are filtered in SQL. The free-text
/// `q` filter runs afterwards over the bilingual title/description, so a page
/// may come back shorter than `limit`.
pub async fn fetch_public_jobs(pool: &PgPool, filters: &JobFilters) -> sqlx::Result<Vec<JobRow>> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM jobs WHERE status = ");
    qb.push_bind(JobStatus::Open.as_str());

    if let Some(category) = &filters.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(min) = filters.min_budget {
        qb.push(" AND budget >= ").push_bind(min);
    }
    if let Some(max) = filters.max_budget {
        qb.push(" AND budget <= ").push_bind(max);
    }
    if !filters.tags.is_empty() {
        qb.push(" AND skills_tags && ").push_bind(filters.tags.clone());
    }

    qb.push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(filters.limit)
        .push(" OFFSET ")
        .push_bind(filters.offset);

    let mut jobs = qb.build_query_as::<JobRow>().fetch_all(pool).await?;

    if let Some(q) = &filters.q {
        jobs.retain(|job| job.matches_search(q));
    }

    Ok(jobs)
}

pub async fn fetch_job_by_id(pool: &PgPool, job_id: Uuid) -> sqlx::Result<Option<JobRow>> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_job_with_employer(
    pool: &PgPool,
    job_id: Uuid,
) -> sqlx::Result<Option<JobWithEmployer>> {
    let Some(job) = fetch_job_by_id(pool, job_id).await? else {
        return Ok(None);
    };

    let employer = sqlx::query_as::<_, EmployerSummary>(
        "SELECT id, full_name, avatar_url FROM profiles WHERE id = $1",
    )
    .bind(job.employer_id)
    .fetch_optional(pool)
    .await?;

    Ok(Some(JobWithEmployer { job, employer }))
}

/// Jobs owned by one employer with their application counts, optionally
/// narrowed to a status, newest first.
pub async fn fetch_employer_jobs(
    pool: &PgPool,
    employer_id: Uuid,
    status: Option<JobStatus>,
) -> sqlx::Result<Vec<EmployerJobRow>> {
    sqlx::query_as::<_, EmployerJobRow>(
        r#"
        SELECT j.*, COUNT(a.id) AS application_count
        FROM jobs j
        LEFT JOIN applications a ON a.job_id = j.id
        WHERE j.employer_id = $1 AND ($2::TEXT IS NULL OR j.status = $2)
        GROUP BY j.id
        ORDER BY j.created_at DESC
        "#,
    )
    .bind(employer_id)
    .bind(status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await
}

/// Job owned by `employer_id`, or `None` if it doesn't exist or belongs to someone else.
pub async fn fetch_owned_job(
    pool: &PgPool,
    job_id: Uuid,
    employer_id: Uuid,
) -> sqlx::Result<Option<JobRow>> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1 AND employer_id = $2")
        .bind(job_id)
        .bind(employer_id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_applications_for_job(
    pool: &PgPool,
    job_id: Uuid,
) -> sqlx::Result<Vec<ApplicationWithApplicant>> {
    let rows = sqlx::query_as::<_, ApplicationApplicantRow>(
        r#"
        SELECT a.*,
               p.full_name  AS applicant_full_name,
               p.avatar_url AS applicant_avatar_url,
               p.skills     AS applicant_skills
        FROM applications a
        JOIN profiles p ON p.id = a.applicant_id
        WHERE a.job_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn fetch_my_applications(
    pool: &PgPool,
    applicant_id: Uuid,
) -> sqlx::Result<Vec<ApplicationWithJob>> {
    let rows = sqlx::query_as::<_, ApplicationJobRow>(
        r#"
        SELECT a.*,
               j.title      AS job_title,
               j.status     AS job_status,
               j.category   AS job_category,
               j.budget     AS job_budget,
               j.created_at AS job_created_at
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        WHERE a.applicant_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(applicant_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn has_applied_to_job(
    pool: &PgPool,
    job_id: Uuid,
    applicant_id: Uuid,
) -> sqlx::Result<bool> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM applications WHERE job_id = $1 AND applicant_id = $2)",
    )
    .bind(job_id)
    .bind(applicant_id)
    .fetch_one(pool)
    .await
}

/// Saved jobs with their job rows, most recently saved first.
pub async fn fetch_saved_jobs(pool: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<SavedJobWithDetails>> {
    let saved = sqlx::query_as::<_, SavedJobRow>(
        "SELECT * FROM saved_jobs WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let job_ids: Vec<Uuid> = saved.iter().map(|s| s.job_id).collect();
    let jobs = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = ANY($1)")
        .bind(job_ids.as_slice())
        .fetch_all(pool)
        .await?;

    Ok(attach_jobs(saved, jobs))
}

/// Pairs saved rows with their jobs, keeping saved-row order. Rows whose job
/// vanished in between the two reads are dropped.
fn attach_jobs(saved: Vec<SavedJobRow>, jobs: Vec<JobRow>) -> Vec<SavedJobWithDetails> {
    let by_id: HashMap<Uuid, JobRow> = jobs.into_iter().map(|job| (job.id, job)).collect();

    saved
        .into_iter()
        .filter_map(|saved| {
            by_id
                .get(&saved.job_id)
                .cloned()
                .map(|job| SavedJobWithDetails { saved, job })
        })
        .collect()
}

pub async fn has_saved_job(pool: &PgPool, job_id: Uuid, user_id: Uuid) -> sqlx::Result<bool> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM saved_jobs WHERE job_id = $1 AND user_id = $2)")
        .bind(job_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobStats {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
    pub draft: usize,
}

impl JobStats {
    pub fn from_statuses<S: AsRef<str>>(statuses: &[S]) -> Self {
        let count = |status: JobStatus| {
            statuses
                .iter()
                .filter(|s| AsRef::<str>::as_ref(*s) == status.as_str())
                .count()
        };
        Self {
            total: statuses.len(),
            open: count(JobStatus::Open),
            closed: count(JobStatus::Closed),
            draft: count(JobStatus::Draft),
        }
    }
}

pub async fn employer_job_stats(pool: &PgPool, employer_id: Uuid) -> sqlx::Result<JobStats> {
    let statuses: Vec<String> = sqlx::query_scalar("SELECT status FROM jobs WHERE employer_id = $1")
        .bind(employer_id)
        .fetch_all(pool)
        .await?;

    Ok(JobStats::from_statuses(&statuses))
}
