//! Audit log endpoints (read-only)

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::{AppError, AppResult},
    models::{
        audit_log::{AuditLogEntry, AuditLogQuery},
        pagination::Paginated,
    },
};

use super::AuthenticatedUser;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// List audit entries filtered by entity and entity id, newest first
#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "logs",
    params(AuditLogQuery),
    responses(
        (status = 200, description = "Page of audit entries", body = Paginated<AuditLogEntry>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_logs(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    WithRejection(Query(query), _): WithRejection<Query<AuditLogQuery>, AppError>,
) -> AppResult<Json<Paginated<AuditLogEntry>>> {
    let page = state.services.audit.search(&query).await?;
    Ok(Json(page))
}

/// Change history of one book
#[utoipa::path(
    get,
    path = "/api/logs/libros/{id}",
    tag = "logs",
    params(
        ("id" = i64, Path, description = "Book ID"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "Page of audit entries", body = Paginated<AuditLogEntry>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn book_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Query(query), _): WithRejection<Query<HistoryQuery>, AppError>,
) -> AppResult<Json<Paginated<AuditLogEntry>>> {
    let page = state
        .services
        .audit
        .book_history(id, query.page, query.limit)
        .await?;
    Ok(Json(page))
}
