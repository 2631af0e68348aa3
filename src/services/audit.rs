//! Audit trail writer and reader

use crate::{
    db::Connection,
    error::AppResult,
    models::{
        audit_log::{AuditLogEntry, AuditLogQuery, NewAuditEntry, RequestMeta, ENTITY_BOOK},
        pagination::{PageRequest, Paginated},
    },
    repository::Repository,
};

/// Default page size for audit listings
pub const DEFAULT_LOG_LIMIT: i64 = 20;

#[derive(Clone)]
pub struct AuditService {
    repository: Repository,
}

impl AuditService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Append one entry on `conn`.
    ///
    /// On the pool the write is best-effort: a failure is logged and swallowed.
    /// Inside a transaction the failure is returned and the mutation rolls back.
    pub async fn record(
        &self,
        conn: &mut Connection,
        entry: NewAuditEntry,
        meta: &RequestMeta,
    ) -> AppResult<()> {
        match self.repository.audit_logs.insert(conn, &entry, meta).await {
            Ok(_) => {
                tracing::debug!(
                    entity = %entry.entity,
                    entity_id = ?entry.entity_id,
                    action = entry.action.as_str(),
                    "Audit entry recorded"
                );
                Ok(())
            }
            Err(e) if !conn.is_transaction() => {
                tracing::error!(
                    entity = %entry.entity,
                    entity_id = ?entry.entity_id,
                    action = entry.action.as_str(),
                    "Audit log write failed: {}",
                    e
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// List entries filtered by entity and/or entity id, newest first
    pub async fn search(&self, query: &AuditLogQuery) -> AppResult<Paginated<AuditLogEntry>> {
        let page = PageRequest::new(query.page, query.limit, DEFAULT_LOG_LIMIT);
        let entity = query
            .entity
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty());

        let (entries, total) = self
            .repository
            .audit_logs
            .search(&mut self.repository.pool(), entity, query.entity_id, page)
            .await?;

        Ok(Paginated::new(entries, page, total))
    }

    /// Change history of one book
    pub async fn book_history(
        &self,
        book_id: i64,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> AppResult<Paginated<AuditLogEntry>> {
        self.search(&AuditLogQuery {
            entity: Some(ENTITY_BOOK.to_string()),
            entity_id: Some(book_id),
            page,
            limit,
        })
        .await
    }
}
