//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, logs};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libros API",
        version = "1.0.0",
        description = "Library book inventory administration API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        auth::logout,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::replace_book,
        books::patch_book,
        books::delete_book,
        // Audit log
        logs::list_logs,
        logs::book_history,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::LogoutResponse,
            crate::models::admin_user::SessionUser,
            // Books
            crate::models::book::Book,
            crate::models::book::BookInput,
            crate::models::book::BookStatus,
            books::DeleteResponse,
            // Audit log
            crate::models::audit_log::AuditLogEntry,
            crate::models::audit_log::AuditAction,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Session authentication"),
        (name = "libros", description = "Book inventory"),
        (name = "logs", description = "Audit trail")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
