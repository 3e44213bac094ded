//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::validation::validate_new_job;
use crate::errors::AppError;
use crate::models::job::{JobListing, NewJob};
use crate::models::profile::UserRole;
use crate::search::{self, paginate, Page, SearchParams};
use crate::session::AuthSession;
use crate::state::AppState;

/// GET /api/v1/jobs
///
/// Job search. Anonymous callers get the same results with `hasApplied` /
/// `isSaved` always false.
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    session: Option<AuthSession>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Page<JobListing>>, AppError> {
    let viewer = session.map(|s| s.user.id);
    let jobs = state.repos.jobs.list_jobs(viewer).await?;
    let results = search::search(&jobs, &params.criteria(), params.sort_spec(), Utc::now());
    Ok(Json(paginate(results, params.page, params.page_size)))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    session: Option<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobListing>, AppError> {
    let viewer = session.map(|s| s.user.id);
    let job = state
        .repos
        .jobs
        .get_job(id, viewer)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}

/// POST /api/v1/jobs
///
/// Recruiters only. The posting is owned by the caller.
pub async fn handle_create_job(
    State(state): State<AppState>,
    session: AuthSession,
    Json(job): Json<NewJob>,
) -> Result<(StatusCode, Json<JobListing>), AppError> {
    session.require_role(UserRole::Recruiter)?;
    validate_new_job(&job)?;
    let listing = state.repos.jobs.create_job(session.user.id, job).await?;
    info!("Job {} posted by {}", listing.id, session.user.id);
    Ok((StatusCode::CREATED, Json(listing)))
}

async fn set_saved(
    state: &AppState,
    session: &AuthSession,
    id: Uuid,
    saved: bool,
) -> Result<JobListing, AppError> {
    let user_id = session.user.id;
    if state.repos.jobs.get_job(id, None).await?.is_none() {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    state.repos.jobs.set_saved(user_id, id, saved).await?;
    state
        .repos
        .jobs
        .get_job(id, Some(user_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

/// POST /api/v1/jobs/:id/save
pub async fn handle_save_job(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Json<JobListing>, AppError> {
    Ok(Json(set_saved(&state, &session, id, true).await?))
}

/// DELETE /api/v1/jobs/:id/save
pub async fn handle_unsave_job(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Json<JobListing>, AppError> {
    Ok(Json(set_saved(&state, &session, id, false).await?))
}
