use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};

use super::CurrentUser;
use crate::errors::AppError;
use crate::models::profile::UserRole;
use crate::state::AppState;

/// Extractor for authenticated routes: `Authorization: Bearer <session token>`.
pub struct AuthSession {
    pub token: String,
    pub user: CurrentUser,
}

impl AuthSession {
    pub fn require_role(&self, role: UserRole) -> Result<(), AppError> {
        if self.user.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?.to_string();
        let user = state
            .sessions
            .load(&token)
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(AuthSession { token, user })
    }
}
