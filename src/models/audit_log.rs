//! Audit trail entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

/// Entity name used for book mutations
pub const ENTITY_BOOK: &str = "book";
/// Entity name used for the dedicated stock movement entries
pub const ENTITY_BOOK_STOCK: &str = "book_stock";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
        }
    }
}

/// Who performed a request and from where
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    pub actor_id: Option<i64>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// An entry about to be appended
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub entity: String,
    pub entity_id: Option<i64>,
    pub action: AuditAction,
    pub before: Option<Value>,
    pub after: Option<Value>,
}

/// Stored audit entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditLogEntry {
    pub id: i64,
    pub entity: String,
    pub entity_id: Option<i64>,
    pub action: AuditAction,
    /// Full record state before the change (null on create)
    #[serde(default, deserialize_with = "snapshot")]
    #[schema(value_type = Option<Object>)]
    pub before: Option<Value>,
    /// Full record state after the change
    #[serde(default, deserialize_with = "snapshot")]
    #[schema(value_type = Option<Object>)]
    pub after: Option<Value>,
    pub changed_by: Option<i64>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Snapshots come back either as JSON values or as JSON text, depending on the engine.
fn snapshot<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => {
            Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
        }
        other => other,
    })
}

/// Audit log listing query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AuditLogQuery {
    /// Entity type, e.g. `book`
    pub entity: Option<String>,
    pub entity_id: Option<i64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
