//! Book inventory endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        audit_log::RequestMeta,
        book::{Book, BookInput, BookQuery},
        pagination::Paginated,
    },
};

use super::AuthenticatedUser;

#[derive(Serialize, ToSchema)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// List books with search, sorting and pagination
#[utoipa::path(
    get,
    path = "/api/libros",
    tag = "libros",
    params(BookQuery),
    responses(
        (status = 200, description = "Page of books", body = Paginated<Book>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    WithRejection(Query(query), _): WithRejection<Query<BookQuery>, AppError>,
) -> AppResult<Json<Paginated<Book>>> {
    let page = state.services.books.list(&query).await?;
    Ok(Json(page))
}

/// Get a book by id, including books in `baja`
#[utoipa::path(
    get,
    path = "/api/libros/{id}",
    tag = "libros",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get(id).await?;
    Ok(Json(book))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/api/libros",
    tag = "libros",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    meta: RequestMeta,
    WithRejection(Json(input), _): WithRejection<Json<BookInput>, AppError>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let meta = RequestMeta {
        actor_id: Some(user.id),
        ..meta
    };
    let created = state.services.books.create(&input, &meta).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace every field of a book
#[utoipa::path(
    put,
    path = "/api/libros/{id}",
    tag = "libros",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book replaced", body = Book),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn replace_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    meta: RequestMeta,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(input), _): WithRejection<Json<BookInput>, AppError>,
) -> AppResult<Json<Book>> {
    let meta = RequestMeta {
        actor_id: Some(user.id),
        ..meta
    };
    let book = state.services.books.replace(id, &input, &meta).await?;
    Ok(Json(book))
}

/// Update the supplied fields of a book
#[utoipa::path(
    patch,
    path = "/api/libros/{id}",
    tag = "libros",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Validation failed or no changes", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn patch_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    meta: RequestMeta,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(input), _): WithRejection<Json<BookInput>, AppError>,
) -> AppResult<Json<Book>> {
    let meta = RequestMeta {
        actor_id: Some(user.id),
        ..meta
    };
    let book = state.services.books.patch(id, &input, &meta).await?;
    Ok(Json(book))
}

/// Soft delete a book (moves it to `baja`)
#[utoipa::path(
    delete,
    path = "/api/libros/{id}",
    tag = "libros",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book moved to baja", body = DeleteResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    meta: RequestMeta,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<Json<DeleteResponse>> {
    let meta = RequestMeta {
        actor_id: Some(user.id),
        ..meta
    };
    state.services.books.delete(id, &meta).await?;
    Ok(Json(DeleteResponse { deleted: true }))
}
