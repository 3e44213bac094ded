use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

use super::{AccessibilityPreferences, CurrentUser, SessionStore};
use crate::errors::AppError;

/// Process-local session store. Sessions expire `ttl` after their last save;
/// expired entries are evicted when loaded or when a new session is saved.
#[derive(Clone)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, (CurrentUser, Instant)>>>,
    preferences: Arc<RwLock<HashMap<Uuid, AccessibilityPreferences>>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: Arc::default(),
            preferences: Arc::default(),
            ttl: Duration::from_secs(ttl_secs),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, token: &str) -> Result<Option<CurrentUser>, AppError> {
        let now = Instant::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return Ok(None),
                Some((user, expires_at)) if *expires_at > now => return Ok(Some(user.clone())),
                Some(_) => {}
            }
        }
        self.sessions.write().await.remove(token);
        Ok(None)
    }

    async fn save(&self, token: &str, user: &CurrentUser) -> Result<(), AppError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, (_, expires_at)| *expires_at > now);
        sessions.insert(token.to_string(), (user.clone(), now + self.ttl));
        Ok(())
    }

    async fn clear(&self, token: &str) -> Result<(), AppError> {
        self.sessions.write().await.remove(token);
        Ok(())
    }

    async fn load_preferences(&self, user_id: Uuid) -> Result<AccessibilityPreferences, AppError> {
        Ok(self
            .preferences
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_preferences(
        &self,
        user_id: Uuid,
        prefs: &AccessibilityPreferences,
    ) -> Result<(), AppError> {
        self.preferences
            .write()
            .await
            .insert(user_id, prefs.clone());
        Ok(())
    }
}
