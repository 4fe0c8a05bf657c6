//! Post and comment entity <-> model mappers

use forum_core::entities::{Comment, Post, ReactionCounts};
use forum_core::value_objects::{ActorId, CommentId, PostId};

use crate::models::{CommentModel, PostModel};

impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: PostId::new(model.id),
            author_id: ActorId::new(model.author_id),
            author_name: model.author_name,
            title: model.title,
            content: model.content,
            categories: model.categories,
            counts: ReactionCounts::new(model.like_count, model.dislike_count),
            created_at: model.created_at,
        }
    }
}

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: CommentId::new(model.id),
            post_id: PostId::new(model.post_id),
            author_id: ActorId::new(model.author_id),
            author_name: model.author_name,
            body: model.body,
            counts: ReactionCounts::new(model.like_count, model.dislike_count),
            created_at: model.created_at,
        }
    }
}
