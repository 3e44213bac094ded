//! Axum route handlers for the Auth API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::service::{open_session, validate_email, validate_registration, SessionGrant};
use crate::auth_client::{OAuthProvider, SignUpOutcome};
use crate::errors::AppError;
use crate::models::profile::UserRole;
use crate::session::AuthSession;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub confirm_password: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum RegisterResponse {
    SignedIn(SessionGrant),
    ConfirmationRequired { email: String },
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthUrlQuery {
    pub redirect_to: String,
}

#[derive(Debug, Serialize)]
pub struct OAuthUrlResponse {
    pub url: String,
}

/// Sent by the UI after the provider redirects back with an access token.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthCallbackRequest {
    pub access_token: String,
    /// Role picked on the sign-up screen before leaving for the provider.
    #[serde(default)]
    pub role: Option<UserRole>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/register
///
/// 201 with a session when the provider signs the user in immediately,
/// 202 when it wants the email confirmed first.
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let email = request.email.trim().to_lowercase();
    validate_registration(
        &request.name,
        &email,
        &request.password,
        request.confirm_password.as_deref(),
    )?;

    let outcome = state
        .auth
        .sign_up(&email, &request.password, request.name.trim(), request.role)
        .await
        .map_err(|e| {
            warn!("Sign-up for {email} rejected: {e}");
            AppError::from(e)
        })?;

    match outcome {
        SignUpOutcome::SignedIn(user) => {
            let grant = open_session(
                state.repos.profiles.as_ref(),
                state.sessions.as_ref(),
                user,
                Some(request.role),
            )
            .await?;
            Ok((StatusCode::CREATED, Json(RegisterResponse::SignedIn(grant))))
        }
        SignUpOutcome::ConfirmationRequired(user) => {
            info!("Sign-up for {} awaiting email confirmation", user.id);
            Ok((
                StatusCode::ACCEPTED,
                Json(RegisterResponse::ConfirmationRequired { email: user.email }),
            ))
        }
    }
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionGrant>, AppError> {
    let email = request.email.trim().to_lowercase();
    validate_email(&email)?;
    if request.password.is_empty() {
        return Err(AppError::invalid_field("password", "Password is required"));
    }

    let (_, user) = state
        .auth
        .sign_in(&email, &request.password)
        .await
        .map_err(|e| {
            warn!("Sign-in for {email} rejected: {e}");
            AppError::from(e)
        })?;

    let grant = open_session(
        state.repos.profiles.as_ref(),
        state.sessions.as_ref(),
        user,
        None,
    )
    .await?;
    Ok(Json(grant))
}

/// GET /api/v1/auth/oauth/:provider?redirectTo=...
pub async fn handle_oauth_url(
    State(state): State<AppState>,
    Path(provider): Path<OAuthProvider>,
    Query(query): Query<OAuthUrlQuery>,
) -> Result<Json<OAuthUrlResponse>, AppError> {
    let url = state
        .auth
        .oauth_authorize_url(provider, &query.redirect_to)?;
    Ok(Json(OAuthUrlResponse { url }))
}

/// POST /api/v1/auth/oauth/callback
pub async fn handle_oauth_callback(
    State(state): State<AppState>,
    Json(request): Json<OAuthCallbackRequest>,
) -> Result<Json<SessionGrant>, AppError> {
    if request.access_token.trim().is_empty() {
        return Err(AppError::invalid_field("accessToken", "Missing access token"));
    }
    let user = state.auth.get_user(request.access_token.trim()).await?;
    let grant = open_session(
        state.repos.profiles.as_ref(),
        state.sessions.as_ref(),
        user,
        request.role,
    )
    .await?;
    Ok(Json(grant))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<StatusCode, AppError> {
    state.sessions.clear(&session.token).await?;
    info!("Session closed for {}", session.user.id);
    Ok(StatusCode::NO_CONTENT)
}
