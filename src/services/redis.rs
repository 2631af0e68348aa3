//! Redis-backed session store, shared by every server instance

use async_trait::async_trait;
use redis::{AsyncCommands, Client};

use super::sessions::{new_session_id, SessionStore};
use crate::{
    error::{AppError, AppResult},
    models::admin_user::SessionUser,
};

#[derive(Clone)]
pub struct RedisSessionStore {
    client: Client,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    /// Create a new Redis session store and check connectivity
    pub async fn new(url: &str, ttl_hours: u64) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        // Test connection
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;

        Ok(Self {
            client,
            ttl_seconds: ttl_hours * 3600,
        })
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))
    }

    fn key(session_id: &str) -> String {
        format!("session:{}", session_id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, user: &SessionUser) -> AppResult<String> {
        let mut conn = self.connection().await?;
        let id = new_session_id();
        let payload = serde_json::to_string(user)?;

        conn.set_ex::<_, _, ()>(Self::key(&id), payload, self.ttl_seconds)
            .await?;

        Ok(id)
    }

    async fn get(&self, session_id: &str) -> AppResult<Option<SessionUser>> {
        let mut conn = self.connection().await?;
        let payload: Option<String> = conn.get(Self::key(session_id)).await?;

        payload
            .map(|p| serde_json::from_str(&p).map_err(AppError::from))
            .transpose()
    }

    async fn destroy(&self, session_id: &str) -> AppResult<()> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(Self::key(session_id)).await?;
        Ok(())
    }
}
