//! First-run onboarding. Professionals record their skills (which feed the
//! recommendation feed); employers record their company branding. Both may
//! skip, which only flips `onboarding_completed`.

use serde::Deserialize;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::profile::{CompanyBranding, ProfileRow, UserRole};
use crate::models::LocalizedText;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum OnboardingRequest {
    Professional {
        #[serde(default)]
        bio_en: String,
        #[serde(default)]
        bio_ar: String,
        #[serde(default)]
        skills: Vec<String>,
    },
    Employer {
        #[serde(default)]
        bio_en: String,
        #[serde(default)]
        bio_ar: String,
        #[serde(default)]
        company_name: String,
        #[serde(default)]
        company_website: String,
    },
}

/// Column values an onboarding request writes. Fields left `None` are untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingUpdate {
    pub role: UserRole,
    pub bio: LocalizedText,
    pub skills: Option<Vec<String>>,
    pub company_branding: Option<CompanyBranding>,
}

impl OnboardingRequest {
    pub fn role(&self) -> UserRole {
        match self {
            OnboardingRequest::Professional { .. } => UserRole::Professional,
            OnboardingRequest::Employer { .. } => UserRole::Employer,
        }
    }

    pub fn into_update(self) -> OnboardingUpdate {
        let role = self.role();
        match self {
            OnboardingRequest::Professional {
                bio_en,
                bio_ar,
                skills,
            } => OnboardingUpdate {
                role,
                bio: LocalizedText::new(bio_en.trim(), bio_ar.trim()),
                skills: Some(
                    skills
                        .iter()
                        .map(|s| s.trim())
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect(),
                ),
                company_branding: None,
            },
            OnboardingRequest::Employer {
                bio_en,
                bio_ar,
                company_name,
                company_website,
            } => OnboardingUpdate {
                role,
                bio: LocalizedText::new(bio_en.trim(), bio_ar.trim()),
                skills: None,
                company_branding: Some(CompanyBranding {
                    name: company_name.trim().to_string(),
                    website: company_website.trim().to_string(),
                }),
            },
        }
    }
}

/// A profile whose role is already set can only onboard as that role. An unset
/// role is adopted from the request.
pub fn check_role(profile: &ProfileRow, requested: UserRole) -> Result<(), AppError> {
    match profile.role() {
        Some(current) if current != requested => Err(AppError::Validation(format!(
            "Account is registered as {}, not {}",
            current.as_str(),
            requested.as_str()
        ))),
        _ => Ok(()),
    }
}

pub async fn complete_onboarding(
    pool: &PgPool,
    profile: &ProfileRow,
    req: OnboardingRequest,
) -> Result<ProfileRow, AppError> {
    check_role(profile, req.role())?;
    let update = req.into_update();

    let updated = sqlx::query_as::<_, ProfileRow>(
        r#"
        UPDATE profiles
        SET role = COALESCE(role, $1),
            bio = $2,
            skills = COALESCE($3, skills),
            company_branding = COALESCE($4, company_branding),
            onboarding_completed = TRUE
        WHERE id = $5
        RETURNING *
        "#,
    )
    .bind(update.role.as_str())
    .bind(Json(&update.bio))
    .bind(update.skills.as_deref())
    .bind(update.company_branding.as_ref().map(Json))
    .bind(profile.id)
    .fetch_one(pool)
    .await?;

    info!(
        "Profile {} completed onboarding as {}",
        profile.id,
        update.role.as_str()
    );
    Ok(updated)
}

pub async fn skip_onboarding(pool: &PgPool, profile: &ProfileRow) -> Result<ProfileRow, AppError> {
    let updated = sqlx::query_as::<_, ProfileRow>(
        "UPDATE profiles SET onboarding_completed = TRUE WHERE id = $1 RETURNING *",
    )
    .bind(profile.id)
    .fetch_one(pool)
    .await?;

    info!("Profile {} skipped onboarding", profile.id);
    Ok(updated)
}
