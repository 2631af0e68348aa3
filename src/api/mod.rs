//! API handlers for the Libros REST endpoints

pub mod auth;
pub mod books;
pub mod health;
pub mod logs;
pub mod openapi;

use std::net::SocketAddr;

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{header, request::Parts, HeaderValue, Method},
    routing::get,
    routing::post,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::ServerConfig,
    error::AppError,
    models::{admin_user::SessionUser, audit_log::RequestMeta},
    AppState,
};

/// Extractor for the admin behind the session cookie
pub struct AuthenticatedUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session_id = jar
            .get(&state.config.session.cookie_name)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(AppError::unauthorized)?;

        let user = state
            .services
            .auth
            .current_user(&session_id)
            .await?
            .ok_or_else(AppError::unauthorized)?;

        Ok(AuthenticatedUser(user))
    }
}

/// Client address: first `X-Forwarded-For` hop, else the peer address
fn client_ip(parts: &Parts) -> Option<String> {
    let forwarded = parts
        .headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string);

    forwarded.or_else(|| {
        parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
    })
}

/// Network metadata for audit entries. The actor is filled in by the handler.
#[async_trait]
impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(RequestMeta {
            actor_id: None,
            ip: client_ip(parts),
            user_agent,
        })
    }
}

/// Credentialed CORS for the admin frontend origin
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
        .allow_credentials(true);

    if let Some(origin) = config.cors_origin.as_deref() {
        match origin.parse::<HeaderValue>() {
            Ok(origin) => cors = cors.allow_origin(origin),
            Err(_) => tracing::warn!("Ignoring invalid CORS origin: {}", origin),
        }
    }

    cors
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server);

    let api = Router::new()
        // Authentication
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
        // Books
        .route("/libros", get(books::list_books).post(books::create_book))
        .route(
            "/libros/:id",
            get(books::get_book)
                .put(books::replace_book)
                .patch(books::patch_book)
                .delete(books::delete_book),
        )
        // Audit log
        .route("/logs", get(logs::list_logs))
        .route("/logs/libros/:id", get(logs::book_history));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api", api)
        .fallback(health::not_found)
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
