//! Administrator accounts and the identity kept in a session

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Administrator account row
#[derive(Debug, Clone, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    /// Argon2 (PHC) or bcrypt hash
    pub password_hash: String,
}

/// Identity stored server-side for an authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
}

impl From<&AdminUser> for SessionUser {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}
