//! Post service
//!
//! Posts and comments are the targets reactions apply to. Listings carry the
//! viewer's own reaction when the request is authenticated.

use forum_core::entities::{Comment, NewComment, NewPost, Post, ReactionState, ReactionTarget};
use forum_core::value_objects::{ActorId, PostId};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{
    CommentResponse, CreateCommentRequest, CreatePostRequest, PostDetailResponse, PostResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::reaction::ReactionEngine;

/// Number of posts on the front page
pub const LATEST_POSTS_LIMIT: i64 = 10;

/// Post service
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    /// Create a new PostService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a post authored by `author_id`
    #[instrument(skip(self, request))]
    pub async fn create_post(
        &self,
        author_id: ActorId,
        request: CreatePostRequest,
    ) -> ServiceResult<PostResponse> {
        request.validate()?;

        let categories = request
            .categories
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();

        let post = self
            .ctx
            .post_repo()
            .create(&NewPost {
                author_id,
                title: request.title.trim().to_string(),
                content: request.content,
                categories,
            })
            .await?;

        info!(post_id = %post.id, "Post created");
        Ok(PostResponse::from(post))
    }

    /// A post with its comments, each annotated with the viewer's reaction
    #[instrument(skip(self))]
    pub async fn get_post(
        &self,
        post_id: PostId,
        viewer: Option<ActorId>,
    ) -> ServiceResult<PostDetailResponse> {
        let post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", post_id))?;
        let comments = self.ctx.comment_repo().find_by_post(post_id).await?;

        let mut comment_responses = Vec::with_capacity(comments.len());
        for comment in comments {
            comment_responses.push(self.annotate_comment(comment, viewer).await);
        }

        Ok(PostDetailResponse {
            post: self.annotate_post(post, viewer).await,
            comments: comment_responses,
        })
    }

    /// The most recent posts, newest first
    #[instrument(skip(self))]
    pub async fn latest_posts(&self, viewer: Option<ActorId>) -> ServiceResult<Vec<PostResponse>> {
        let posts = self.ctx.post_repo().latest(LATEST_POSTS_LIMIT).await?;
        Ok(self.annotate_posts(posts, viewer).await)
    }

    /// Posts written by `actor_id`
    #[instrument(skip(self))]
    pub async fn posts_by_author(&self, actor_id: ActorId) -> ServiceResult<Vec<PostResponse>> {
        let posts = self.ctx.post_repo().find_by_author(actor_id).await?;
        Ok(self.annotate_posts(posts, Some(actor_id)).await)
    }

    /// Posts `actor_id` currently likes
    #[instrument(skip(self))]
    pub async fn posts_liked_by(&self, actor_id: ActorId) -> ServiceResult<Vec<PostResponse>> {
        let posts = self.ctx.post_repo().find_liked_by(actor_id).await?;
        Ok(self.annotate_posts(posts, Some(actor_id)).await)
    }

    /// Comment on a post
    #[instrument(skip(self, request))]
    pub async fn create_comment(
        &self,
        author_id: ActorId,
        post_id: PostId,
        request: CreateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        request.validate()?;

        let comment = self
            .ctx
            .comment_repo()
            .create(&NewComment {
                post_id,
                author_id,
                body: request.body,
            })
            .await?;

        info!(comment_id = %comment.id, post_id = %post_id, "Comment created");
        Ok(CommentResponse::from(comment))
    }

    async fn viewer_state(
        &self,
        viewer: Option<ActorId>,
        target: ReactionTarget,
    ) -> Option<ReactionState> {
        match viewer {
            Some(actor_id) => Some(
                ReactionEngine::new(self.ctx)
                    .reaction_state(actor_id, target)
                    .await,
            ),
            None => None,
        }
    }

    async fn annotate_post(&self, post: Post, viewer: Option<ActorId>) -> PostResponse {
        let state = self.viewer_state(viewer, post.target()).await;
        PostResponse::with_viewer(post, state)
    }

    async fn annotate_comment(&self, comment: Comment, viewer: Option<ActorId>) -> CommentResponse {
        let state = self.viewer_state(viewer, comment.target()).await;
        CommentResponse::with_viewer(comment, state)
    }

    async fn annotate_posts(&self, posts: Vec<Post>, viewer: Option<ActorId>) -> Vec<PostResponse> {
        let mut responses = Vec::with_capacity(posts.len());
        for post in posts {
            responses.push(self.annotate_post(post, viewer).await);
        }
        responses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::harness;
    use forum_core::{DomainError, Polarity};

    fn post_request(title: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: title.to_string(),
            content: "Some content".to_string(),
            categories: vec![" rust ".to_string(), String::new()],
        }
    }

    #[tokio::test]
    async fn test_create_and_get_post() {
        let h = harness();
        let author = h.user("author").await;
        let posts = PostService::new(&h.ctx);

        let created = posts.create_post(author, post_request("Hello")).await.unwrap();
        assert_eq!(created.categories, vec!["rust".to_string()]);
        assert_eq!(created.like_count, 0);

        let detail = posts.get_post(created.id, None).await.unwrap();
        assert_eq!(detail.post.title, "Hello");
        assert!(detail.post.viewer_reaction.is_none());
        assert!(detail.comments.is_empty());
    }

    #[tokio::test]
    async fn test_create_post_validation() {
        let h = harness();
        let author = h.user("author").await;
        let posts = PostService::new(&h.ctx);

        let err = posts
            .create_post(author, post_request("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = posts
            .create_post(
                author,
                CreatePostRequest {
                    categories: vec![],
                    ..post_request("ok")
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_get_post_includes_viewer_reactions() {
        let h = harness();
        let author = h.user("author").await;
        let viewer = h.user("viewer").await;
        let post = h.post(author, "p").await;
        let comment = h.comment(author, &post).await;

        let engine = ReactionEngine::new(&h.ctx);
        engine
            .set_reaction(viewer, post.target(), Polarity::Like)
            .await
            .unwrap();
        engine
            .set_reaction(viewer, comment.target(), Polarity::Dislike)
            .await
            .unwrap();

        let detail = PostService::new(&h.ctx)
            .get_post(post.id, Some(viewer))
            .await
            .unwrap();
        assert_eq!(detail.post.viewer_reaction, Some(ReactionState::Liked));
        assert_eq!(detail.post.like_count, 1);
        assert_eq!(detail.comments[0].viewer_reaction, Some(ReactionState::Disliked));
        assert_eq!(detail.comments[0].dislike_count, 1);
    }

    #[tokio::test]
    async fn test_get_missing_post() {
        let h = harness();
        let err = PostService::new(&h.ctx)
            .get_post(PostId::new(42), None)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_latest_posts_limit_and_order() {
        let h = harness();
        let author = h.user("author").await;
        for i in 0..12 {
            h.post(author, &format!("post {i}")).await;
        }

        let latest = PostService::new(&h.ctx).latest_posts(None).await.unwrap();
        assert_eq!(latest.len(), 10);
        assert_eq!(latest[0].title, "post 11");
    }

    #[tokio::test]
    async fn test_posts_by_author_and_liked_by() {
        let h = harness();
        let alice = h.user("alice").await;
        let bob = h.user("bob").await;
        let alices = h.post(alice, "alice's").await;
        h.post(bob, "bob's").await;

        ReactionEngine::new(&h.ctx)
            .set_reaction(bob, alices.target(), Polarity::Like)
            .await
            .unwrap();

        let posts = PostService::new(&h.ctx);
        let by_alice = posts.posts_by_author(alice).await.unwrap();
        assert_eq!(by_alice.len(), 1);
        assert_eq!(by_alice[0].id, alices.id);

        let liked = posts.posts_liked_by(bob).await.unwrap();
        assert_eq!(liked.len(), 1);
        assert_eq!(liked[0].viewer_reaction, Some(ReactionState::Liked));
    }

    #[tokio::test]
    async fn test_create_comment() {
        let h = harness();
        let author = h.user("author").await;
        let post = h.post(author, "p").await;
        let posts = PostService::new(&h.ctx);

        let comment = posts
            .create_comment(
                author,
                post.id,
                CreateCommentRequest {
                    body: "first".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(comment.post_id, post.id);

        let err = posts
            .create_comment(
                author,
                PostId::new(999),
                CreateCommentRequest {
                    body: "x".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::PostNotFound(_))));

        let err = posts
            .create_comment(
                author,
                post.id,
                CreateCommentRequest {
                    body: "x".repeat(101),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
