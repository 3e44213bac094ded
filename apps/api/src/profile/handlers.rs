//! Axum route handlers for the Profile API.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::session::{AuthSession, CurrentUser};
use crate::state::AppState;

/// Editable profile fields. The role is fixed at sign-up.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub name: Option<String>,
    /// `Some("")` clears the avatar.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    fn apply(self, mut profile: Profile) -> Result<Profile, AppError> {
        if let Some(name) = self.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::invalid_field("name", "Name cannot be empty"));
            }
            profile.name = name.to_string();
        }
        if let Some(url) = self.avatar_url {
            let url = url.trim();
            profile.avatar_url = if url.is_empty() {
                None
            } else {
                reqwest::Url::parse(url)
                    .map_err(|_| AppError::invalid_field("avatarUrl", "Not a valid URL"))?;
                Some(url.to_string())
            };
        }
        Ok(profile)
    }
}

async fn load_profile(state: &AppState, session: &AuthSession) -> Result<Profile, AppError> {
    state
        .repos
        .profiles
        .get_profile(session.user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", session.user.id)))
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(load_profile(&state, &session).await?))
}

/// PUT /api/v1/profile
///
/// Also rewrites the cached session record so the header reflects the change.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    session: AuthSession,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Profile>, AppError> {
    let profile = update.apply(load_profile(&state, &session).await?)?;
    let profile = state.repos.profiles.upsert_profile(&profile).await?;
    state
        .sessions
        .save(&session.token, &CurrentUser::from(&profile))
        .await?;
    info!("Profile {} updated", profile.id);
    Ok(Json(profile))
}
