//! Audit log repository. Rows are only ever inserted and read.

use chrono::Utc;

use crate::{
    db::{Connection, SqlValue},
    error::AppResult,
    models::{
        audit_log::{AuditLogEntry, NewAuditEntry, RequestMeta},
        pagination::PageRequest,
    },
};

const COLUMNS: &str = r#"id, entity, entity_id, action, before_data AS "before", after_data AS "after",
       changed_by, ip, user_agent, created_at"#;

#[derive(Clone, Copy, Default)]
pub struct AuditLogsRepository;

impl AuditLogsRepository {
    pub async fn insert(
        &self,
        conn: &mut Connection,
        entry: &NewAuditEntry,
        meta: &RequestMeta,
    ) -> AppResult<u64> {
        let result = conn
            .query(
                "INSERT INTO audit_logs \
                 (entity, entity_id, action, before_data, after_data, changed_by, ip, user_agent, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                &[
                    SqlValue::from(entry.entity.as_str()),
                    SqlValue::from(entry.entity_id),
                    SqlValue::from(entry.action.as_str()),
                    SqlValue::Json(entry.before.clone()),
                    SqlValue::Json(entry.after.clone()),
                    SqlValue::from(meta.actor_id),
                    SqlValue::from(meta.ip.clone()),
                    SqlValue::from(meta.user_agent.clone()),
                    SqlValue::from(Utc::now()),
                ],
            )
            .await?;

        Ok(result.affected)
    }

    /// List entries, newest first, optionally filtered by entity and entity id
    pub async fn search(
        &self,
        conn: &mut Connection,
        entity: Option<&str>,
        entity_id: Option<i64>,
        page: PageRequest,
    ) -> AppResult<(Vec<AuditLogEntry>, i64)> {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(entity) = entity {
            conditions.push("entity = ?");
            params.push(SqlValue::from(entity));
        }
        if let Some(entity_id) = entity_id {
            conditions.push("entity_id = ?");
            params.push(SqlValue::from(entity_id));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let total = conn
            .query(
                &format!("SELECT COUNT(*) AS total FROM audit_logs {}", where_clause),
                &params,
            )
            .await?
            .scalar_i64("total");

        let (paging, paging_params) = conn.paginate(page.limit, page.offset());
        params.extend(paging_params);

        let entries = conn
            .query(
                &format!(
                    "SELECT {} FROM audit_logs {} ORDER BY created_at DESC, id DESC {}",
                    COLUMNS, where_clause, paging
                ),
                &params,
            )
            .await?
            .into_typed()?;

        Ok((entries, total))
    }
}
