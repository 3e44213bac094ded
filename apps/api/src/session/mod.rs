//! Server-side session state: the signed-in user record keyed by session token,
//! and per-user accessibility preferences.

pub mod extract;
pub mod handlers;
pub mod memory;
pub mod redis_store;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{Profile, UserRole};

pub use extract::AuthSession;
pub use memory::MemorySessionStore;
pub use redis_store::RedisSessionStore;

/// The signed-in user as cached in the session store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
}

impl From<&Profile> for CurrentUser {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email.clone(),
            name: profile.name.clone(),
            role: profile.user_role,
            avatar_url: profile.avatar_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
    ExtraLarge,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessibilityPreferences {
    pub font_size: FontSize,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, token: &str) -> Result<Option<CurrentUser>, AppError>;

    async fn save(&self, token: &str, user: &CurrentUser) -> Result<(), AppError>;

    async fn clear(&self, token: &str) -> Result<(), AppError>;

    /// Missing preferences load as the defaults.
    async fn load_preferences(&self, user_id: Uuid) -> Result<AccessibilityPreferences, AppError>;

    async fn save_preferences(
        &self,
        user_id: Uuid,
        prefs: &AccessibilityPreferences,
    ) -> Result<(), AppError>;
}

pub fn new_session_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Where the UI should land for this session.
pub fn redirect_target(user: Option<&CurrentUser>) -> &'static str {
    match user.map(|u| u.role) {
        None => "/login",
        Some(UserRole::JobSeeker) => "/dashboard/job-seeker",
        Some(UserRole::Recruiter) => "/dashboard/recruiter",
    }
}
