//! Repository layer for database operations

pub mod admin_users;
pub mod audit_logs;
pub mod books;

use std::sync::Arc;

use crate::{
    db::{Connection, Database},
    error::AppResult,
};

/// Main repository struct holding the database handle
#[derive(Clone)]
pub struct Repository {
    pub db: Arc<dyn Database>,
    pub books: books::BooksRepository,
    pub admin_users: admin_users::AdminUsersRepository,
    pub audit_logs: audit_logs::AuditLogsRepository,
}

impl Repository {
    /// Create a new repository over the given database
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self {
            books: books::BooksRepository,
            admin_users: admin_users::AdminUsersRepository,
            audit_logs: audit_logs::AuditLogsRepository,
            db,
        }
    }

    /// Connection on the shared pool
    pub fn pool(&self) -> Connection {
        Connection::Pool(self.db.clone())
    }

    /// Pool connection, or a fresh transaction when `transactional`
    pub async fn connection(&self, transactional: bool) -> AppResult<Connection> {
        if transactional {
            Ok(Connection::Transaction(self.db.begin().await?))
        } else {
            Ok(self.pool())
        }
    }
}
