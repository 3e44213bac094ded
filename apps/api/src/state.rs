use std::sync::Arc;

use crate::auth_client::AuthProvider;
use crate::config::Config;
use crate::repo::Repositories;
use crate::session::SessionStore;
use crate::storage::ObjectStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    /// Bucket for uploaded documents. S3 in hosted mode.
    pub storage: Arc<dyn ObjectStore>,
    /// Current-user records and accessibility preferences. Redis in hosted mode.
    pub sessions: Arc<dyn SessionStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub config: Config,
}
