//! Reaction handlers
//!
//! One endpoint per target kind; both go through the same reaction engine.

use axum::{extract::State, Json};
use forum_core::ReactionTarget;
use forum_service::dto::{ReactionResponse, SetReactionRequest};
use forum_service::ReactionEngine;

use crate::extractors::{AuthUser, CommentPath, IdPath, JsonBody, PostPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// Set the caller's reaction on a post
///
/// PUT /posts/{post_id}/reaction
pub async fn set_post_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(path): IdPath<PostPath>,
    JsonBody(request): JsonBody<SetReactionRequest>,
) -> ApiResult<Json<ReactionResponse>> {
    let target = ReactionTarget::post(path.post_id()?);
    set_reaction(&state, auth, target, request).await
}

/// Set the caller's reaction on a comment
///
/// PUT /posts/{post_id}/comments/{comment_id}/reaction
pub async fn set_comment_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(path): IdPath<CommentPath>,
    JsonBody(request): JsonBody<SetReactionRequest>,
) -> ApiResult<Json<ReactionResponse>> {
    let target = ReactionTarget::comment(path.comment_id()?, path.post_id()?);
    set_reaction(&state, auth, target, request).await
}

async fn set_reaction(
    state: &AppState,
    auth: AuthUser,
    target: ReactionTarget,
    request: SetReactionRequest,
) -> ApiResult<Json<ReactionResponse>> {
    let engine = ReactionEngine::new(state.service_context());
    let outcome = engine
        .set_reaction(auth.actor_id, target, request.reaction)
        .await?;
    Ok(Json(ReactionResponse::from(outcome)))
}
