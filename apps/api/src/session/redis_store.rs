use async_trait::async_trait;
use redis::Client as RedisClient;
use tracing::debug;
use uuid::Uuid;

use super::{AccessibilityPreferences, CurrentUser, SessionStore};
use crate::errors::AppError;

const SESSION_PREFIX: &str = "session:";
const PREFERENCES_PREFIX: &str = "preferences:";

/// Redis-backed session store. Sessions expire after `ttl_secs`; preferences persist.
pub struct RedisSessionStore {
    client: RedisClient,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(client: RedisClient, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, AppError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, token: &str) -> Result<Option<CurrentUser>, AppError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(format!("{SESSION_PREFIX}{token}"))
            .query_async(&mut conn)
            .await?;
        match raw {
            Some(json) => Ok(Some(
                serde_json::from_str(&json).map_err(anyhow::Error::from)?,
            )),
            None => Ok(None),
        }
    }

    async fn save(&self, token: &str, user: &CurrentUser) -> Result<(), AppError> {
        let json = serde_json::to_string(user).map_err(anyhow::Error::from)?;
        let mut conn = self.connection().await?;
        redis::cmd("SET")
            .arg(format!("{SESSION_PREFIX}{token}"))
            .arg(json)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        debug!("Saved session for user {}", user.id);
        Ok(())
    }

    async fn clear(&self, token: &str) -> Result<(), AppError> {
        let mut conn = self.connection().await?;
        redis::cmd("DEL")
            .arg(format!("{SESSION_PREFIX}{token}"))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn load_preferences(&self, user_id: Uuid) -> Result<AccessibilityPreferences, AppError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(format!("{PREFERENCES_PREFIX}{user_id}"))
            .query_async(&mut conn)
            .await?;
        match raw {
            Some(json) => Ok(serde_json::from_str(&json).map_err(anyhow::Error::from)?),
            None => Ok(AccessibilityPreferences::default()),
        }
    }

    async fn save_preferences(
        &self,
        user_id: Uuid,
        prefs: &AccessibilityPreferences,
    ) -> Result<(), AppError> {
        let json = serde_json::to_string(prefs).map_err(anyhow::Error::from)?;
        let mut conn = self.connection().await?;
        redis::cmd("SET")
            .arg(format!("{PREFERENCES_PREFIX}{user_id}"))
            .arg(json)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}
