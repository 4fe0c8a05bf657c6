//! User handlers
//!
//! Endpoints for the current user's profile and posts.

use axum::{extract::State, Json};
use forum_service::dto::{PostResponse, UserResponse};
use forum_service::{AuthService, PostService};

use crate::extractors::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// Get current user
///
/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.current_user(auth.actor_id).await?;
    Ok(Json(response))
}

/// Posts written by the current user
///
/// GET /users/@me/posts
pub async fn get_my_posts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let service = PostService::new(state.service_context());
    let response = service.posts_by_author(auth.actor_id).await?;
    Ok(Json(response))
}

/// Posts the current user likes
///
/// GET /users/@me/liked
pub async fn get_liked_posts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let service = PostService::new(state.service_context());
    let response = service.posts_liked_by(auth.actor_id).await?;
    Ok(Json(response))
}
