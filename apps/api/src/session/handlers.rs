//! Axum route handlers for the Session API.

use axum::{extract::State, Json};
use serde::Serialize;

use super::{redirect_target, AccessibilityPreferences, AuthSession, CurrentUser};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub user: Option<CurrentUser>,
    pub redirect_to: &'static str,
}

/// GET /api/v1/session
///
/// Read on every page load: who is signed in and where the UI should land.
/// A missing or expired token is not an error.
pub async fn handle_get_session(session: Option<AuthSession>) -> Json<SessionStatus> {
    let user = session.map(|s| s.user);
    Json(SessionStatus {
        redirect_to: redirect_target(user.as_ref()),
        user,
    })
}

/// GET /api/v1/session/preferences
pub async fn handle_get_preferences(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<AccessibilityPreferences>, AppError> {
    let prefs = state.sessions.load_preferences(session.user.id).await?;
    Ok(Json(prefs))
}

/// PUT /api/v1/session/preferences
pub async fn handle_put_preferences(
    State(state): State<AppState>,
    session: AuthSession,
    Json(prefs): Json<AccessibilityPreferences>,
) -> Result<Json<AccessibilityPreferences>, AppError> {
    state
        .sessions
        .save_preferences(session.user.id, &prefs)
        .await?;
    Ok(Json(prefs))
}
