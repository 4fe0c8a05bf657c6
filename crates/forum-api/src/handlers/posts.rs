//! Post handlers
//!
//! Endpoints for posts and comments.

use axum::{extract::State, Json};
use forum_service::dto::{
    CommentResponse, CreateCommentRequest, CreatePostRequest, PostDetailResponse, PostResponse,
};
use forum_service::PostService;

use crate::extractors::{AuthUser, IdPath, MaybeAuthUser, PostPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Latest posts
///
/// GET /posts
pub async fn list_posts(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let service = PostService::new(state.service_context());
    let response = service.latest_posts(viewer.actor_id()).await?;
    Ok(Json(response))
}

/// Create a post
///
/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> ApiResult<Created<Json<PostResponse>>> {
    let service = PostService::new(state.service_context());
    let response = service.create_post(auth.actor_id, request).await?;
    Ok(Created(Json(response)))
}

/// A post with its comments
///
/// GET /posts/{post_id}
pub async fn get_post(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    IdPath(path): IdPath<PostPath>,
) -> ApiResult<Json<PostDetailResponse>> {
    let service = PostService::new(state.service_context());
    let response = service.get_post(path.post_id()?, viewer.actor_id()).await?;
    Ok(Json(response))
}

/// Comment on a post
///
/// POST /posts/{post_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(path): IdPath<PostPath>,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<Json<CommentResponse>>> {
    let service = PostService::new(state.service_context());
    let response = service
        .create_comment(auth.actor_id, path.post_id()?, request)
        .await?;
    Ok(Created(Json(response)))
}
