//! Books repository for database operations

use chrono::Utc;

use crate::{
    db::{contains_pattern, Connection, Dialect, SqlValue},
    error::AppResult,
    models::book::{Book, BookFields, BookQuery, BookStatus},
    models::pagination::PageRequest,
};

/// Columns matched by the free-text search
const SEARCH_COLUMNS: [&str; 3] = ["titulo", "autor", "categoria"];

#[derive(Clone, Copy, Default)]
pub struct BooksRepository;

impl BooksRepository {
    // =========================================================================
    // READ
    // =========================================================================

    /// Get a book by id, whatever its estado
    pub async fn get_by_id(&self, conn: &mut Connection, id: i64) -> AppResult<Option<Book>> {
        conn.query("SELECT * FROM books WHERE id = ?", &[SqlValue::from(id)])
            .await?
            .first_as()
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    /// Search books with pagination. Soft-deleted rows are hidden unless requested.
    pub async fn search(
        &self,
        conn: &mut Connection,
        query: &BookQuery,
        page: PageRequest,
    ) -> AppResult<(Vec<Book>, i64)> {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if !query.include_baja() {
            conditions.push("estado <> 'baja'".to_string());
        }

        if let Some(term) = query.search_term() {
            let dialect = conn.dialect();
            let matches: Vec<String> = SEARCH_COLUMNS.iter().map(|c| dialect.ci_like(c)).collect();
            conditions.push(format!("({})", matches.join(" OR ")));
            let pattern = contains_pattern(&term);
            params.extend(std::iter::repeat(SqlValue::from(pattern)).take(SEARCH_COLUMNS.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let total = conn
            .query(
                &format!("SELECT COUNT(*) AS total FROM books {}", where_clause),
                &params,
            )
            .await?
            .scalar_i64("total");

        let direction = if query.sort_ascending() { "ASC" } else { "DESC" };
        let (paging, paging_params) = conn.paginate(page.limit, page.offset());
        params.extend(paging_params);

        let select_query = format!(
            "SELECT * FROM books {} ORDER BY {} {}, id {} {}",
            where_clause,
            query.sort_field().column(),
            direction,
            direction,
            paging
        );

        let books = conn.query(&select_query, &params).await?.into_typed()?;

        Ok((books, total))
    }

    // =========================================================================
    // CREATE
    // =========================================================================

    /// Insert a new book; omitted optional columns take their defaults
    pub async fn create(&self, conn: &mut Connection, fields: &BookFields) -> AppResult<Book> {
        let now = Utc::now();
        let row = with_folded_copies(conn.dialect(), fields.complete_row());

        let columns: Vec<&str> = row.iter().map(|(c, _)| *c).collect();
        let mut params: Vec<SqlValue> = row.into_iter().map(|(_, v)| v).collect();
        params.push(SqlValue::from(now));
        params.push(SqlValue::from(now));

        let placeholders = vec!["?"; params.len()].join(", ");
        let sql = format!(
            "INSERT INTO books ({}, created_at, updated_at) VALUES ({}) RETURNING *",
            columns.join(", "),
            placeholders
        );

        conn.query(&sql, &params)
            .await?
            .first_as()?
            .ok_or_else(|| crate::error::AppError::Internal("Insert returned no row".to_string()))
    }

    // =========================================================================
    // UPDATE
    // =========================================================================

    /// Replace every mutable column
    pub async fn replace(
        &self,
        conn: &mut Connection,
        id: i64,
        fields: &BookFields,
    ) -> AppResult<Option<Book>> {
        self.update_columns(conn, id, fields.complete_row()).await
    }

    /// Update only the supplied columns
    pub async fn patch(
        &self,
        conn: &mut Connection,
        id: i64,
        fields: &BookFields,
    ) -> AppResult<Option<Book>> {
        self.update_columns(conn, id, fields.changes()).await
    }

    /// Soft delete: mark as `baja`, the row is kept
    pub async fn soft_delete(&self, conn: &mut Connection, id: i64) -> AppResult<Option<Book>> {
        self.update_columns(conn, id, vec![("estado", SqlValue::from(BookStatus::Baja.as_str()))])
            .await
    }

    /// `updated_at` is always stamped once, after the supplied columns.
    async fn update_columns(
        &self,
        conn: &mut Connection,
        id: i64,
        columns: Vec<(&'static str, SqlValue)>,
    ) -> AppResult<Option<Book>> {
        let columns = with_folded_copies(conn.dialect(), columns);
        let mut assignments: Vec<String> = columns
            .iter()
            .map(|(column, _)| format!("{} = ?", column))
            .collect();
        assignments.push("updated_at = ?".to_string());

        let mut params: Vec<SqlValue> = columns.into_iter().map(|(_, v)| v).collect();
        params.push(SqlValue::from(Utc::now()));
        params.push(SqlValue::from(id));

        let sql = format!(
            "UPDATE books SET {} WHERE id = ? RETURNING *",
            assignments.join(", ")
        );

        conn.query(&sql, &params).await?.first_as()
    }
}

/// Append the lowercased `_ci` copy of every searchable column present in
/// `columns`, for dialects that match against those copies.
fn with_folded_copies(
    dialect: Dialect,
    mut columns: Vec<(&'static str, SqlValue)>,
) -> Vec<(&'static str, SqlValue)> {
    if !dialect.stores_folded_copies() {
        return columns;
    }

    let folded: Vec<(&'static str, SqlValue)> = columns
        .iter()
        .filter_map(|(column, value)| {
            let copy = match *column {
                "titulo" => "titulo_ci",
                "autor" => "autor_ci",
                "categoria" => "categoria_ci",
                _ => return None,
            };
            let value = match value {
                SqlValue::Text(text) => SqlValue::Text(text.as_deref().map(str::to_lowercase)),
                other => other.clone(),
            };
            Some((copy, value))
        })
        .collect();

    columns.extend(folded);
    columns
}
