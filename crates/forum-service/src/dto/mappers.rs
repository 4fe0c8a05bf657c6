//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use forum_core::entities::{Comment, Post, ReactionOutcome, ReactionState, User};

use super::responses::{CommentResponse, PostResponse, ReactionResponse, UserResponse};

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl PostResponse {
    /// Attach the viewer's reaction to a post
    pub fn with_viewer(post: Post, viewer_reaction: Option<ReactionState>) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            author_name: post.author_name,
            title: post.title,
            content: post.content,
            categories: post.categories,
            like_count: post.counts.likes,
            dislike_count: post.counts.dislikes,
            viewer_reaction,
            created_at: post.created_at,
        }
    }
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self::with_viewer(post, None)
    }
}

impl CommentResponse {
    /// Attach the viewer's reaction to a comment
    pub fn with_viewer(comment: Comment, viewer_reaction: Option<ReactionState>) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            author_name: comment.author_name,
            body: comment.body,
            like_count: comment.counts.likes,
            dislike_count: comment.counts.dislikes,
            viewer_reaction,
            created_at: comment.created_at,
        }
    }
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self::with_viewer(comment, None)
    }
}

impl From<ReactionOutcome> for ReactionResponse {
    fn from(outcome: ReactionOutcome) -> Self {
        Self {
            target: outcome.target,
            reaction: outcome.state,
            like_count: outcome.counts.likes,
            dislike_count: outcome.counts.dislikes,
            changed: outcome.changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use forum_core::{ActorId, PostId, ReactionCounts, ReactionTarget};

    #[test]
    fn test_post_to_response() {
        let post = Post {
            id: PostId::new(1),
            author_id: ActorId::new(2),
            author_name: "bob".to_string(),
            title: "t".to_string(),
            content: "c".to_string(),
            categories: vec!["news".to_string()],
            counts: ReactionCounts::new(4, 1),
            created_at: Utc::now(),
        };

        let response = PostResponse::from(post);
        assert_eq!(response.like_count, 4);
        assert_eq!(response.dislike_count, 1);
        assert!(response.viewer_reaction.is_none());
    }

    #[test]
    fn test_outcome_to_response() {
        let outcome = ReactionOutcome {
            target: ReactionTarget::post(PostId::new(1)),
            state: ReactionState::Disliked,
            counts: ReactionCounts::new(0, 1),
            changed: true,
        };

        let response = ReactionResponse::from(outcome);
        assert_eq!(response.reaction, ReactionState::Disliked);
        assert_eq!(response.counts(), ReactionCounts::new(0, 1));
    }
}
