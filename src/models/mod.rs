//! Data models for Libros

pub mod admin_user;
pub mod audit_log;
pub mod book;
pub mod pagination;

// Re-export commonly used types
pub use admin_user::{AdminUser, SessionUser};
pub use audit_log::{AuditAction, AuditLogEntry, AuditLogQuery, NewAuditEntry, RequestMeta};
pub use book::{Book, BookFields, BookInput, BookQuery, BookStatus, SanitizeMode};
pub use pagination::{PageRequest, Paginated};
