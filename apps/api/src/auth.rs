//! Identity extraction. Tokens are issued by an external identity provider;
//! this service only verifies them and maps the subject onto a profile row.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{ProfileRow, UserRole};
use crate::state::AppState;

const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    /// Role chosen at sign-up; only used when the profile is first provisioned.
    #[serde(default)]
    pub role: Option<UserRole>,
    pub exp: usize,
}

/// The authenticated caller, as asserted by the identity provider.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub signup_role: Option<UserRole>,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| session_cookie(parts))
            .ok_or_else(|| AppError::Unauthorized("missing bearer token or session cookie".into()))?;

        let claims = decode_token(&token, &state.config.jwt_secret)?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            signup_role: claims.role,
        })
    }
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|err| AppError::Unauthorized(format!("invalid token: {err}")))
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn session_cookie(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// Loads the caller's profile, provisioning an empty one on first sight.
pub async fn load_profile(pool: &PgPool, user: &AuthUser) -> Result<ProfileRow, AppError> {
    sqlx::query(
        r#"
        INSERT INTO profiles (id, email, role)
        VALUES ($1, $2, $3)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(user.user_id)
    .bind(user.email.as_deref().unwrap_or_default())
    .bind(user.signup_role.map(|r| r.as_str()))
    .execute(pool)
    .await?;

    let profile = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
        .bind(user.user_id)
        .fetch_one(pool)
        .await?;

    Ok(profile)
}

/// Loads the caller's profile and rejects callers who haven't finished onboarding.
pub async fn require_onboarding(pool: &PgPool, user: &AuthUser) -> Result<ProfileRow, AppError> {
    let profile = load_profile(pool, user).await?;
    ensure_onboarded(&profile)?;
    Ok(profile)
}

pub fn ensure_onboarded(profile: &ProfileRow) -> Result<(), AppError> {
    if profile.onboarding_completed {
        Ok(())
    } else {
        Err(AppError::OnboardingRequired)
    }
}

pub fn require_role(profile: &ProfileRow, role: UserRole, message: &str) -> Result<(), AppError> {
    if profile.has_role(role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(message.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::fixtures::make_profile;
    use axum::http::Request;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn make_token(sub: Uuid, role: Option<UserRole>, secret: &str) -> String {
        let claims = Claims {
            sub,
            email: Some("pro@example.com".to_string()),
            role,
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn parts_with(header: axum::http::HeaderName, value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header(header, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_decode_valid_token() {
        let id = Uuid::new_v4();
        let token = make_token(id, Some(UserRole::Professional), SECRET);
        let claims = decode_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Some(UserRole::Professional));
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        let token = make_token(Uuid::new_v4(), None, "other-secret");
        assert!(matches!(
            decode_token(&token, SECRET),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_decode_rejects_expired_token() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: None,
            role: None,
            exp: 1_000,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap();
        assert!(decode_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_bearer_token_extraction() {
        let parts = parts_with(AUTHORIZATION, "Bearer abc.def.ghi");
        assert_eq!(bearer_token(&parts).as_deref(), Some("abc.def.ghi"));

        let parts = parts_with(AUTHORIZATION, "Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_session_cookie_extraction() {
        let parts = parts_with(COOKIE, "theme=dark; session=tok.en.value; locale=ar");
        assert_eq!(session_cookie(&parts).as_deref(), Some("tok.en.value"));

        let parts = parts_with(COOKIE, "theme=dark");
        assert_eq!(session_cookie(&parts), None);
    }

    #[test]
    fn test_ensure_onboarded() {
        assert!(ensure_onboarded(&make_profile(Some(UserRole::Employer), true)).is_ok());
        assert!(matches!(
            ensure_onboarded(&make_profile(Some(UserRole::Employer), false)),
            Err(AppError::OnboardingRequired)
        ));
    }

    #[test]
    fn test_require_role() {
        let employer = make_profile(Some(UserRole::Employer), true);
        assert!(require_role(&employer, UserRole::Employer, "x").is_ok());

        let err = require_role(&employer, UserRole::Professional, "Only professionals can apply to jobs")
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(msg) if msg == "Only professionals can apply to jobs"));
    }
}
