//! Authentication handlers
//!
//! Endpoints for user registration, login, and logout. Login sets the session
//! cookie; logout clears it.

use axum::{
    extract::State,
    http::header,
    response::{AppendHeaders, IntoResponse},
    Json,
};
use forum_service::dto::{LoginRequest, RegisterRequest, UserResponse};
use forum_service::AuthService;

use crate::extractors::{SessionToken, ValidatedJson};
use crate::response::{
    expired_session_cookie, session_cookie, ApiError, ApiResult, Created, NoContent,
};
use crate::state::AppState;

/// Register a new user
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<UserResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(Json(response)))
}

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;

    let settings = state.session();
    let cookie = session_cookie(
        &settings.cookie_name,
        &response.token,
        response.expires_in,
        settings.cookie_secure,
    )
    .map_err(ApiError::internal)?;

    Ok((AppendHeaders([(header::SET_COOKIE, cookie)]), Json(response)))
}

/// Logout; revokes the session and clears the cookie
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    token: SessionToken,
) -> ApiResult<impl IntoResponse> {
    let service = AuthService::new(state.service_context());
    service.logout(token.as_deref()).await?;

    let cookie =
        expired_session_cookie(&state.session().cookie_name).map_err(ApiError::internal)?;
    Ok((AppendHeaders([(header::SET_COOKIE, cookie)]), NoContent))
}
