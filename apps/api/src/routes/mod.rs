pub mod health;

#[cfg(test)]
mod tests;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};

use crate::state::AppState;
use crate::{applications, auth, dashboard, documents, jobs, profile, session};

/// Room for multipart boundaries and the small text parts next to the file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/register", post(auth::handlers::handle_register))
        .route("/api/v1/auth/login", post(auth::handlers::handle_login))
        .route(
            "/api/v1/auth/oauth/callback",
            post(auth::handlers::handle_oauth_callback),
        )
        .route(
            "/api/v1/auth/oauth/:provider",
            get(auth::handlers::handle_oauth_url),
        )
        .route("/api/v1/auth/logout", post(auth::handlers::handle_logout))
        // Session
        .route("/api/v1/session", get(session::handlers::handle_get_session))
        .route(
            "/api/v1/session/preferences",
            get(session::handlers::handle_get_preferences)
                .put(session::handlers::handle_put_preferences),
        )
        .route(
            "/api/v1/profile",
            get(profile::handlers::handle_get_profile).put(profile::handlers::handle_update_profile),
        )
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handlers::handle_search_jobs).post(jobs::handlers::handle_create_job),
        )
        .route("/api/v1/jobs/:id", get(jobs::handlers::handle_get_job))
        .route(
            "/api/v1/jobs/:id/save",
            post(jobs::handlers::handle_save_job).delete(jobs::handlers::handle_unsave_job),
        )
        // Applications
        .route(
            "/api/v1/applications",
            get(applications::handlers::handle_list_applications)
                .post(applications::handlers::handle_submit_application),
        )
        .route(
            "/api/v1/applications/quick-apply",
            post(applications::handlers::handle_quick_apply),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(applications::handlers::handle_update_status),
        )
        .route(
            "/api/v1/applications/:id/interview",
            post(applications::handlers::handle_schedule_interview),
        )
        // Documents
        .route(
            "/api/v1/documents",
            get(documents::handlers::handle_list_documents)
                .post(documents::handlers::handle_upload_document)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/v1/documents/:id",
            delete(documents::handlers::handle_delete_document),
        )
        // Dashboard
        .route(
            "/api/v1/dashboard/stats",
            get(dashboard::handlers::handle_dashboard_stats),
        )
        .route(
            "/api/v1/dashboard/actions",
            get(dashboard::handlers::handle_list_actions)
                .post(dashboard::handlers::handle_quick_action),
        )
        .with_state(state)
}
