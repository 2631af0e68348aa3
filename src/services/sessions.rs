//! Server-side session storage keyed by an opaque session id

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{error::AppResult, models::admin_user::SessionUser};

/// Storage for authenticated sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Open a session for `user` and return its id
    async fn create(&self, user: &SessionUser) -> AppResult<String>;

    /// Resolve a session id; expired or unknown ids yield `None`
    async fn get(&self, session_id: &str) -> AppResult<Option<SessionUser>>;

    async fn destroy(&self, session_id: &str) -> AppResult<()>;
}

/// New random session id
pub fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()
}

struct SessionRecord {
    user: SessionUser,
    expires_at: DateTime<Utc>,
}

/// In-process store; sessions do not survive a restart
pub struct MemorySessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new(ttl_hours: u64) -> Self {
        Self {
            ttl: Duration::hours(ttl_hours as i64),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user: &SessionUser) -> AppResult<String> {
        let now = Utc::now();
        let id = new_session_id();

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, record| record.expires_at > now);
        sessions.insert(
            id.clone(),
            SessionRecord {
                user: user.clone(),
                expires_at: now + self.ttl,
            },
        );

        Ok(id)
    }

    async fn get(&self, session_id: &str) -> AppResult<Option<SessionUser>> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(session_id) {
                None => return Ok(None),
                Some(record) if record.expires_at > now => return Ok(Some(record.user.clone())),
                Some(_) => {}
            }
        }

        self.sessions.write().await.remove(session_id);
        Ok(None)
    }

    async fn destroy(&self, session_id: &str) -> AppResult<()> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }
}
