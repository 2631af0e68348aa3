//! Book inventory service: CRUD with soft delete and audit side effects

use serde_json::{json, Value};

use super::audit::AuditService;
use crate::{
    config::AuditConfig,
    db::Connection,
    error::{AppError, AppResult},
    models::{
        audit_log::{AuditAction, NewAuditEntry, RequestMeta, ENTITY_BOOK, ENTITY_BOOK_STOCK},
        book::{Book, BookFields, BookInput, BookQuery, BookStatus, SanitizeMode},
        pagination::{PageRequest, Paginated},
    },
    repository::Repository,
};

/// Default page size for book listings
pub const DEFAULT_BOOK_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    audit: AuditService,
    config: AuditConfig,
}

/// Run the sanitizer and turn its messages into a single validation error
fn sanitize(input: &BookInput, mode: SanitizeMode) -> AppResult<BookFields> {
    let (fields, errors) = input.sanitize(mode);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join(", ")));
    }
    Ok(fields)
}

fn snapshot(book: &Book) -> AppResult<Value> {
    Ok(serde_json::to_value(book)?)
}

impl BooksService {
    pub fn new(repository: Repository, audit: AuditService, config: AuditConfig) -> Self {
        Self {
            repository,
            audit,
            config,
        }
    }

    async fn connection(&self) -> AppResult<Connection> {
        self.repository.connection(self.config.transactional).await
    }

    /// Paginated listing; `baja` books are hidden unless `includeBaja` is set
    pub async fn list(&self, query: &BookQuery) -> AppResult<Paginated<Book>> {
        let page = PageRequest::new(query.page, query.limit, DEFAULT_BOOK_LIMIT);
        let (books, total) = self
            .repository
            .books
            .search(&mut self.repository.pool(), query, page)
            .await?;
        Ok(Paginated::new(books, page, total))
    }

    /// Fetch one book whatever its estado
    pub async fn get(&self, id: i64) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(&mut self.repository.pool(), id)
            .await?
            .ok_or_else(AppError::not_found)
    }

    pub async fn create(&self, input: &BookInput, meta: &RequestMeta) -> AppResult<Book> {
        let fields = sanitize(input, SanitizeMode::Full)?;

        let mut conn = self.connection().await?;
        let book = self.repository.books.create(&mut conn, &fields).await?;

        self.audit
            .record(
                &mut conn,
                NewAuditEntry {
                    entity: ENTITY_BOOK.to_string(),
                    entity_id: Some(book.id),
                    action: AuditAction::Create,
                    before: None,
                    after: Some(snapshot(&book)?),
                },
                meta,
            )
            .await?;
        conn.finish().await?;

        tracing::info!(book_id = book.id, titulo = %book.titulo, "Book created");
        Ok(book)
    }

    /// Full replacement; omitted optional columns go back to their defaults
    pub async fn replace(&self, id: i64, input: &BookInput, meta: &RequestMeta) -> AppResult<Book> {
        let fields = sanitize(input, SanitizeMode::Full)?;

        let mut conn = self.connection().await?;
        let before = self
            .repository
            .books
            .get_by_id(&mut conn, id)
            .await?
            .ok_or_else(AppError::not_found)?;

        let after = self
            .repository
            .books
            .replace(&mut conn, id, &fields)
            .await?
            .ok_or_else(AppError::not_found)?;

        self.record_update(&mut conn, &before, &after, meta).await?;
        conn.finish().await?;

        tracing::info!(book_id = id, "Book replaced");
        Ok(after)
    }

    /// Partial update of the supplied fields only
    pub async fn patch(&self, id: i64, input: &BookInput, meta: &RequestMeta) -> AppResult<Book> {
        let fields = sanitize(input, SanitizeMode::Partial)?;
        if fields.is_empty() {
            return Err(AppError::Validation("Sin cambios".to_string()));
        }

        let mut conn = self.connection().await?;
        let before = self
            .repository
            .books
            .get_by_id(&mut conn, id)
            .await?
            .ok_or_else(AppError::not_found)?;

        let after = self
            .repository
            .books
            .patch(&mut conn, id, &fields)
            .await?
            .ok_or_else(AppError::not_found)?;

        self.record_update(&mut conn, &before, &after, meta).await?;

        if self.config.track_stock_changes && fields.stock.is_some() && before.stock != after.stock {
            self.audit
                .record(
                    &mut conn,
                    NewAuditEntry {
                        entity: ENTITY_BOOK_STOCK.to_string(),
                        entity_id: Some(id),
                        action: AuditAction::Update,
                        before: Some(json!({ "stock": before.stock })),
                        after: Some(json!({
                            "stock": after.stock,
                            "delta": after.stock - before.stock,
                        })),
                    },
                    meta,
                )
                .await?;
        }
        conn.finish().await?;

        tracing::info!(book_id = id, "Book updated");
        Ok(after)
    }

    /// Soft delete. A book already in `baja` is left untouched and not audited again.
    pub async fn delete(&self, id: i64, meta: &RequestMeta) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let before = self
            .repository
            .books
            .get_by_id(&mut conn, id)
            .await?
            .ok_or_else(AppError::not_found)?;

        if before.estado == BookStatus::Baja {
            conn.finish().await?;
            tracing::debug!(book_id = id, "Book already in baja, nothing to do");
            return Ok(());
        }

        let after = self
            .repository
            .books
            .soft_delete(&mut conn, id)
            .await?
            .ok_or_else(AppError::not_found)?;

        self.audit
            .record(
                &mut conn,
                NewAuditEntry {
                    entity: ENTITY_BOOK.to_string(),
                    entity_id: Some(id),
                    action: AuditAction::Delete,
                    before: Some(snapshot(&before)?),
                    after: Some(snapshot(&after)?),
                },
                meta,
            )
            .await?;
        conn.finish().await?;

        tracing::info!(book_id = id, "Book moved to baja");
        Ok(())
    }

    async fn record_update(
        &self,
        conn: &mut Connection,
        before: &Book,
        after: &Book,
        meta: &RequestMeta,
    ) -> AppResult<()> {
        self.audit
            .record(
                conn,
                NewAuditEntry {
                    entity: ENTITY_BOOK.to_string(),
                    entity_id: Some(after.id),
                    action: AuditAction::Update,
                    before: Some(snapshot(before)?),
                    after: Some(snapshot(after)?),
                },
                meta,
            )
            .await
    }
}
