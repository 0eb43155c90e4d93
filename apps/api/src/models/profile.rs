use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::localized::LocalizedText;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Employer,
    Professional,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Employer => "employer",
            UserRole::Professional => "professional",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employer" => Ok(UserRole::Employer),
            "professional" => Ok(UserRole::Professional),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyBranding {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub website: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: Json<LocalizedText>,
    pub role: Option<String>,
    pub bio: Json<LocalizedText>,
    pub avatar_url: Option<String>,
    pub skills: Vec<String>,
    pub company_branding: Option<Json<CompanyBranding>>,
    pub onboarding_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl ProfileRow {
    /// Parsed role. Unknown or unset roles read as `None`.
    pub fn role(&self) -> Option<UserRole> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.role() == Some(role)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn make_profile(role: Option<UserRole>, onboarded: bool) -> ProfileRow {
        ProfileRow {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            full_name: Json(LocalizedText::new("Sam", "سام")),
            role: role.map(|r| r.as_str().to_string()),
            bio: Json(LocalizedText::default()),
            avatar_url: None,
            skills: vec![],
            company_branding: None,
            onboarding_completed: onboarded,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::make_profile;
    use super::*;

    #[test]
    fn test_role_parses_known_values() {
        let profile = make_profile(Some(UserRole::Employer), true);
        assert_eq!(profile.role(), Some(UserRole::Employer));
        assert!(profile.has_role(UserRole::Employer));
        assert!(!profile.has_role(UserRole::Professional));
    }

    #[test]
    fn test_unknown_role_reads_as_none() {
        let mut profile = make_profile(None, true);
        assert_eq!(profile.role(), None);
        profile.role = Some("admin".to_string());
        assert_eq!(profile.role(), None);
    }
}
