//! Axum route handlers for the Applications API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::service::{self, ApplyFlow, ScheduleInterview, SubmitApplication};
use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::profile::UserRole;
use crate::search::{self, paginate, Page, SearchParams};
use crate::session::{AuthSession, CurrentUser};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ApplicationStatus,
}

/// A write plus the refreshed list it affected.
#[derive(Debug, Serialize)]
pub struct ApplicationMutationResponse {
    pub application: Application,
    pub applications: Vec<Application>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// Seekers see their own applications; recruiters see applications to their postings.
async fn visible_applications(
    state: &AppState,
    user: &CurrentUser,
) -> Result<Vec<Application>, AppError> {
    match user.role {
        UserRole::JobSeeker => state.repos.applications.list_for_user(user.id).await,
        UserRole::Recruiter => state.repos.applications.list_for_recruiter(user.id).await,
    }
}

async fn mutation_response(
    state: &AppState,
    user: &CurrentUser,
    application: Application,
) -> Result<Json<ApplicationMutationResponse>, AppError> {
    let applications = visible_applications(state, user).await?;
    Ok(Json(ApplicationMutationResponse {
        application,
        applications,
    }))
}

/// GET /api/v1/applications
///
/// Application tracking view: same filter/sort/"load more" pipeline as job search.
pub async fn handle_list_applications(
    State(state): State<AppState>,
    session: AuthSession,
    Query(params): Query<SearchParams>,
) -> Result<Json<Page<Application>>, AppError> {
    let applications = visible_applications(&state, &session.user).await?;
    let results = search::search(
        &applications,
        &params.criteria(),
        params.sort_spec(),
        Utc::now(),
    );
    Ok(Json(paginate(results, params.page, params.page_size)))
}

/// POST /api/v1/applications
pub async fn handle_submit_application(
    State(state): State<AppState>,
    session: AuthSession,
    Json(request): Json<SubmitApplication>,
) -> Result<(StatusCode, Json<ApplicationMutationResponse>), AppError> {
    let application = service::submit_application(
        state.repos.applications.as_ref(),
        state.repos.jobs.as_ref(),
        &session.user,
        request,
        ApplyFlow::Full,
    )
    .await?;
    let body = mutation_response(&state, &session.user, application).await?;
    Ok((StatusCode::CREATED, body))
}

/// POST /api/v1/applications/quick-apply
pub async fn handle_quick_apply(
    State(state): State<AppState>,
    session: AuthSession,
    Json(request): Json<SubmitApplication>,
) -> Result<(StatusCode, Json<ApplicationMutationResponse>), AppError> {
    let application = service::submit_application(
        state.repos.applications.as_ref(),
        state.repos.jobs.as_ref(),
        &session.user,
        request,
        ApplyFlow::Quick,
    )
    .await?;
    let body = mutation_response(&state, &session.user, application).await?;
    Ok((StatusCode::CREATED, body))
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<ApplicationMutationResponse>, AppError> {
    let application = service::update_status(
        state.repos.applications.as_ref(),
        state.repos.jobs.as_ref(),
        &session.user,
        id,
        request.status,
    )
    .await?;
    mutation_response(&state, &session.user, application).await
}

/// POST /api/v1/applications/:id/interview
pub async fn handle_schedule_interview(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
    Json(request): Json<ScheduleInterview>,
) -> Result<Json<ApplicationMutationResponse>, AppError> {
    let application = service::schedule_interview(
        state.repos.applications.as_ref(),
        state.repos.jobs.as_ref(),
        &session.user,
        id,
        request,
        Utc::now(),
    )
    .await?;
    mutation_response(&state, &session.user, application).await
}
