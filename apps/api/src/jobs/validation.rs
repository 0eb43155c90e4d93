//! Boundary validation for job-board inputs. Raw request bodies are turned into
//! typed, trimmed values here; nothing downstream re-checks them.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::job::{ApplicationStatus, JobStatus};
use crate::models::LocalizedText;

pub const MAX_COVER_LETTER_CHARS: usize = 5000;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct JobInput {
    pub title_en: String,
    pub title_ar: String,
    pub description_en: String,
    pub description_ar: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub skills_tags: Vec<String>,
    #[serde(default)]
    pub status: JobStatus,
}

/// A job payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidJob {
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub category: Option<String>,
    pub budget: Option<f64>,
    pub skills_tags: Vec<String>,
    pub status: JobStatus,
}

impl JobInput {
    pub fn validate(self) -> Result<ValidJob, AppError> {
        let title = LocalizedText::new(
            required(&self.title_en, "English title is required")?,
            required(&self.title_ar, "Arabic title is required")?,
        );
        let description = LocalizedText::new(
            required(&self.description_en, "English description is required")?,
            required(&self.description_ar, "Arabic description is required")?,
        );

        let budget = match self.budget {
            Some(b) if !b.is_finite() || b < 0.0 => {
                return Err(AppError::Validation("Budget must be a non-negative number".into()))
            }
            // A zero budget is stored as "not specified".
            Some(b) if b == 0.0 => None,
            other => other,
        };

        let skills_tags = self
            .skills_tags
            .iter()
            .map(|tag| required(tag, "Skill tags cannot be empty"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidJob {
            title,
            description,
            category: optional(self.category.as_deref()),
            budget,
            skills_tags,
            status: self.status,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplyInput {
    #[serde(default)]
    pub cover_letter: Option<String>,
}

impl ApplyInput {
    /// Trimmed cover letter; blank reads as none.
    pub fn validate(self) -> Result<Option<String>, AppError> {
        let cover_letter = optional(self.cover_letter.as_deref());
        if let Some(letter) = &cover_letter {
            if letter.chars().count() > MAX_COVER_LETTER_CHARS {
                return Err(AppError::Validation("Cover letter too long".into()));
            }
        }
        Ok(cover_letter)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishInput {
    pub publish: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationStatusInput {
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobSearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
    /// Comma-separated.
    pub tags: Option<String>,
    pub min_budget: Option<f64>,
    pub max_budget: Option<f64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Filters for the public job board, ready for the query layer.
#[derive(Debug, Clone, PartialEq)]
pub struct JobFilters {
    pub q: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub min_budget: Option<f64>,
    pub max_budget: Option<f64>,
    pub limit: i64,
    pub offset: i64,
}

impl JobFilters {
    /// Unfiltered first page of `limit` open jobs.
    pub fn first(limit: i64) -> Self {
        Self {
            q: None,
            category: None,
            tags: Vec::new(),
            min_budget: None,
            max_budget: None,
            limit,
            offset: 0,
        }
    }
}

impl JobSearchParams {
    pub fn validate(self) -> Result<JobFilters, AppError> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::Validation("page must be at least 1".into()));
        }

        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        let min_budget = non_negative_budget(self.min_budget, "min_budget")?;
        let max_budget = non_negative_budget(self.max_budget, "max_budget")?;

        let tags = self
            .tags
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(JobFilters {
            q: optional(self.q.as_deref()),
            category: optional(self.category.as_deref()),
            tags,
            min_budget,
            max_budget,
            limit: i64::from(limit),
            offset: i64::from(page - 1) * i64::from(limit),
        })
    }
}

fn required(value: &str, message: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AppError::Validation(message.to_string()))
    } else {
        Ok(trimmed.to_string())
    }
}

fn optional(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Zero means "no bound", matching how the board's filter form submits blanks.
fn non_negative_budget(value: Option<f64>, field: &str) -> Result<Option<f64>, AppError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(AppError::Validation(format!(
            "{field} must be a non-negative number"
        ))),
        Some(v) if v == 0.0 => Ok(None),
        other => Ok(other),
    }
}
