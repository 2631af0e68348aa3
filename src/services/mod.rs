//! Business logic services

pub mod audit;
pub mod auth;
pub mod books;
pub mod redis;
pub mod sessions;

use std::sync::Arc;

use crate::{config::AuditConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub books: books::BooksService,
    pub audit: audit::AuditService,
}

impl Services {
    /// Create all services with the given repository and session store
    pub fn new(
        repository: Repository,
        sessions: Arc<dyn sessions::SessionStore>,
        audit_config: AuditConfig,
    ) -> Self {
        let audit = audit::AuditService::new(repository.clone());
        Self {
            auth: auth::AuthService::new(repository.clone(), sessions),
            books: books::BooksService::new(repository, audit.clone(), audit_config),
            audit,
        }
    }
}
