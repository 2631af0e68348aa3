//! Session authentication endpoints

use axum::{extract::State, Json};
use axum_extra::extract::{
    cookie::{Cookie, CookieJar, SameSite},
    WithRejection,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    config::{SameSitePolicy, SessionConfig},
    error::{AppError, AppResult},
    models::admin_user::SessionUser,
};

use super::AuthenticatedUser;

/// Login request body
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login response body
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub user: SessionUser,
}

#[derive(Serialize, ToSchema)]
pub struct LogoutResponse {
    pub success: bool,
}

fn session_cookie(config: &SessionConfig, session_id: String) -> Cookie<'static> {
    let same_site = match config.same_site {
        SameSitePolicy::Lax => SameSite::Lax,
        SameSitePolicy::Strict => SameSite::Strict,
        SameSitePolicy::None => SameSite::None,
    };

    Cookie::build((config.cookie_name.clone(), session_id))
        .path("/")
        .http_only(true)
        .same_site(same_site)
        .secure(config.secure)
        .build()
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, session cookie set", body = LoginResponse),
        (status = 400, description = "Missing credentials", body = crate::error::ErrorResponse),
        (status = 401, description = "Unknown user or wrong password", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    jar: CookieJar,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, AppError>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let username = request.username.unwrap_or_default();
    let password = request.password.unwrap_or_default();

    let (session_id, user) = state.services.auth.login(&username, &password).await?;
    let jar = jar.add(session_cookie(&state.config.session, session_id));

    Ok((jar, Json(LoginResponse { success: true, user })))
}

/// Get the admin behind the current session
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current admin", body = SessionUser),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(AuthenticatedUser(user): AuthenticatedUser) -> AppResult<Json<SessionUser>> {
    Ok(Json(user))
}

/// Destroy the current session
#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session closed", body = LogoutResponse)
    )
)]
pub async fn logout(
    State(state): State<crate::AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<LogoutResponse>)> {
    let cookie_name = state.config.session.cookie_name.clone();

    if let Some(cookie) = jar.get(&cookie_name) {
        state.services.auth.logout(cookie.value()).await?;
    }

    let jar = jar.remove(Cookie::build(cookie_name).path("/"));
    Ok((jar, Json(LogoutResponse { success: true })))
}
