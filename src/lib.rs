//! Libros administration server
//!
//! Session-authenticated REST JSON API over a library book inventory, with
//! soft deletes and a before/after audit trail of every mutation.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub db: Arc<dyn db::Database>,
}
