use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::Taggable;
use crate::models::localized::LocalizedText;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Open,
    Closed,
    #[default]
    Draft,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Closed => "closed",
            JobStatus::Draft => "draft",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(JobStatus::Open),
            "closed" => Ok(JobStatus::Closed),
            "draft" => Ok(JobStatus::Draft),
            other => Err(format!("unknown job status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub title: Json<LocalizedText>,
    pub description: Json<LocalizedText>,
    pub category: Option<String>,
    pub budget: Option<f64>,
    pub skills_tags: Vec<String>,
    pub ai_tags: Vec<String>,
    pub ai_summary: Json<LocalizedText>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRow {
    pub fn is_open(&self) -> bool {
        self.status == JobStatus::Open.as_str()
    }

    /// Case-insensitive text search over title and description, both languages.
    pub fn matches_search(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.contains_ignore_case(&needle) || self.description.contains_ignore_case(&needle)
    }
}

impl Taggable for JobRow {
    fn explicit_tags(&self) -> &[String] {
        &self.skills_tags
    }

    fn auxiliary_tags(&self) -> &[String] {
        &self.ai_tags
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployerSummary {
    pub id: Uuid,
    pub full_name: Json<LocalizedText>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobWithEmployer {
    #[serde(flatten)]
    pub job: JobRow,
    pub employer: Option<EmployerSummary>,
}

/// A job on its owner's dashboard.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EmployerJobRow {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub job: JobRow,
    pub application_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub cover_letter: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedJobRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedJobWithDetails {
    #[serde(flatten)]
    pub saved: SavedJobRow,
    pub job: JobRow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantSummary {
    pub id: Uuid,
    pub full_name: Json<LocalizedText>,
    pub avatar_url: Option<String>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithApplicant {
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub applicant: ApplicantSummary,
}

/// Flat join row: applications ⋈ profiles.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationApplicantRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub cover_letter: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub applicant_full_name: Json<LocalizedText>,
    pub applicant_avatar_url: Option<String>,
    pub applicant_skills: Vec<String>,
}

impl From<ApplicationApplicantRow> for ApplicationWithApplicant {
    fn from(row: ApplicationApplicantRow) -> Self {
        Self {
            applicant: ApplicantSummary {
                id: row.applicant_id,
                full_name: row.applicant_full_name,
                avatar_url: row.applicant_avatar_url,
                skills: row.applicant_skills,
            },
            application: ApplicationRow {
                id: row.id,
                job_id: row.job_id,
                applicant_id: row.applicant_id,
                cover_letter: row.cover_letter,
                status: row.status,
                created_at: row.created_at,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: Uuid,
    pub title: Json<LocalizedText>,
    pub status: String,
    pub category: Option<String>,
    pub budget: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub job: JobSummary,
}

/// Flat join row: applications ⋈ jobs.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationJobRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub cover_letter: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub job_title: Json<LocalizedText>,
    pub job_status: String,
    pub job_category: Option<String>,
    pub job_budget: Option<f64>,
    pub job_created_at: DateTime<Utc>,
}

impl From<ApplicationJobRow> for ApplicationWithJob {
    fn from(row: ApplicationJobRow) -> Self {
        Self {
            job: JobSummary {
                id: row.job_id,
                title: row.job_title,
                status: row.job_status,
                category: row.job_category,
                budget: row.job_budget,
                created_at: row.job_created_at,
            },
            application: ApplicationRow {
                id: row.id,
                job_id: row.job_id,
                applicant_id: row.applicant_id,
                cover_letter: row.cover_letter,
                status: row.status,
                created_at: row.created_at,
            },
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::make_job;
    use super::*;
    use crate::matching::rank;

    #[test]
    fn test_job_status_round_trips_through_str() {
        for status in [JobStatus::Open, JobStatus::Closed, JobStatus::Draft] {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
        }
        assert!("archived".parse::<JobStatus>().is_err());
    }

    #[test]
    fn test_job_status_default_is_draft() {
        assert_eq!(JobStatus::default(), JobStatus::Draft);
    }

    #[test]
    fn test_matches_search_title_and_description() {
        let job = make_job(&[], &[]);
        assert!(job.matches_search("BACKEND"));
        assert!(job.matches_search("postgresql"));
        assert!(job.matches_search("مهندس"));
        assert!(!job.matches_search("designer"));
    }

    #[test]
    fn test_job_ranks_on_skills_then_ai_tags() {
        let job = make_job(&["Rust"], &["postgresql", "rust"]);
        let ranked = rank(&["rust", "PostgreSQL"], vec![job], 20);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score, 3);
        assert_eq!(ranked[0].matched_tags, vec!["Rust", "postgresql", "rust"]);
    }

    #[test]
    fn test_job_with_employer_flattens_job_fields() {
        let job = make_job(&["sql"], &[]);
        let id = job.id;
        let value = serde_json::to_value(JobWithEmployer {
            job,
            employer: None,
        })
        .unwrap();
        assert_eq!(value["id"], serde_json::json!(id));
        assert_eq!(value["title"]["en"], "Backend Engineer");
        assert!(value["employer"].is_null());
    }

    #[test]
    fn test_employer_job_row_flattens_with_count() {
        let job = make_job(&["rust"], &[]);
        let value = serde_json::to_value(EmployerJobRow {
            job,
            application_count: 3,
        })
        .unwrap();
        assert_eq!(value["application_count"], 3);
        assert_eq!(value["status"], "open");
        assert!(value.get("job").is_none());
    }
}
