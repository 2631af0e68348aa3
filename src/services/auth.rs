//! Administrator authentication and session lifecycle

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::sessions::SessionStore;
use crate::{
    error::{AppError, AppResult},
    models::admin_user::{AdminUser, SessionUser},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    sessions: Arc<dyn SessionStore>,
}

impl AuthService {
    pub fn new(repository: Repository, sessions: Arc<dyn SessionStore>) -> Self {
        Self { repository, sessions }
    }

    /// Check credentials and open a session. Returns the session id and its user.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(String, SessionUser)> {
        let user = self.authenticate(username, password).await?;
        let session_user = SessionUser::from(&user);
        let session_id = self.sessions.create(&session_user).await?;

        tracing::info!(user_id = user.id, username = %user.username, "Admin logged in");
        Ok((session_id, session_user))
    }

    async fn authenticate(&self, username: &str, password: &str) -> AppResult<AdminUser> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::BadRequest("Faltan credenciales".to_string()));
        }

        let user = self
            .repository
            .admin_users
            .get_by_username(&mut self.repository.pool(), username.trim())
            .await?
            .ok_or_else(|| AppError::Authentication("Usuario no encontrado".to_string()))?;

        // Hash verification is CPU-bound
        let hash = user.password_hash.clone();
        let candidate = password.to_string();
        let valid = tokio::task::spawn_blocking(move || verify_password(&candidate, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password check aborted: {}", e)))??;

        if !valid {
            tracing::warn!(username = %user.username, "Login rejected: wrong password");
            return Err(AppError::Authentication("Contraseña incorrecta".to_string()));
        }

        Ok(user)
    }

    /// Resolve the user behind a session id
    pub async fn current_user(&self, session_id: &str) -> AppResult<Option<SessionUser>> {
        self.sessions.get(session_id).await
    }

    pub async fn logout(&self, session_id: &str) -> AppResult<()> {
        self.sessions.destroy(session_id).await
    }
}

/// Verify a password against an Argon2 (PHC) or bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    if hash.starts_with("$2") {
        return bcrypt::verify(password, hash)
            .map_err(|e| AppError::Internal(format!("Failed to verify bcrypt password: {}", e)));
    }

    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}
