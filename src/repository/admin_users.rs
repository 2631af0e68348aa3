//! Administrator accounts repository

use crate::{
    db::{Connection, SqlValue},
    error::{AppError, AppResult},
    models::admin_user::AdminUser,
};

#[derive(Clone, Copy, Default)]
pub struct AdminUsersRepository;

impl AdminUsersRepository {
    /// Get admin user by username (authentication lookup)
    pub async fn get_by_username(
        &self,
        conn: &mut Connection,
        username: &str,
    ) -> AppResult<Option<AdminUser>> {
        conn.query(
            "SELECT id, username, password_hash FROM admin_users WHERE username = ?",
            &[SqlValue::from(username)],
        )
        .await?
        .first_as()
    }

    /// Insert an admin account with an already hashed password
    pub async fn create(
        &self,
        conn: &mut Connection,
        username: &str,
        password_hash: &str,
    ) -> AppResult<AdminUser> {
        conn.query(
            "INSERT INTO admin_users (username, password_hash) VALUES (?, ?) \
             RETURNING id, username, password_hash",
            &[SqlValue::from(username), SqlValue::from(password_hash)],
        )
        .await?
        .first_as()?
        .ok_or_else(|| AppError::Internal("Insert returned no row".to_string()))
    }
}
