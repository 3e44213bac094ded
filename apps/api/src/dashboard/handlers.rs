//! Axum route handlers for the Dashboard API.

use axum::{extract::State, Json};
use chrono::Utc;

use super::actions::{ActionTarget, QuickAction};
use super::stats::{summarize_applications, DashboardStats};
use crate::errors::AppError;
use crate::models::profile::UserRole;
use crate::session::AuthSession;
use crate::state::AppState;

/// GET /api/v1/dashboard/stats
pub async fn handle_dashboard_stats(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<DashboardStats>, AppError> {
    let user = &session.user;
    let now = Utc::now();

    let stats = match user.role {
        UserRole::JobSeeker => {
            let applications = state.repos.applications.list_for_user(user.id).await?;
            let jobs = state.repos.jobs.list_jobs(Some(user.id)).await?;
            DashboardStats::JobSeeker {
                applications: summarize_applications(&applications, now),
                saved_jobs: jobs.iter().filter(|j| j.is_saved).count(),
            }
        }
        UserRole::Recruiter => {
            let applications = state.repos.applications.list_for_recruiter(user.id).await?;
            let jobs = state.repos.jobs.list_jobs(None).await?;
            DashboardStats::Recruiter {
                applications: summarize_applications(&applications, now),
                active_postings: jobs
                    .iter()
                    .filter(|j| j.recruiter_id == Some(user.id))
                    .count(),
            }
        }
    };
    Ok(Json(stats))
}

/// GET /api/v1/dashboard/actions
pub async fn handle_list_actions(session: AuthSession) -> Json<&'static [QuickAction]> {
    Json(QuickAction::for_role(session.user.role))
}

/// POST /api/v1/dashboard/actions
///
/// Body: `{"action": "<kebab-case action>"}`. Returns where the UI should go.
pub async fn handle_quick_action(
    session: AuthSession,
    Json(action): Json<QuickAction>,
) -> Result<Json<ActionTarget>, AppError> {
    Ok(Json(action.resolve(session.user.role)?))
}
