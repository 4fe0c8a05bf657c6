//! Posts and comments - the two reaction targets

use chrono::{DateTime, Utc};

use super::reaction::{ReactionCounts, ReactionTarget};
use crate::value_objects::{ActorId, CommentId, PostId};

/// Maximum length of a post title, in characters
pub const MAX_TITLE_LENGTH: usize = 100;

/// Maximum length of a comment body, in characters
pub const MAX_COMMENT_LENGTH: usize = 100;

/// Forum post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub author_id: ActorId,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub categories: Vec<String>,
    pub counts: ReactionCounts,
    pub created_at: DateTime<Utc>,
}

impl Post {
    #[inline]
    pub fn target(&self) -> ReactionTarget {
        ReactionTarget::post(self.id)
    }
}

/// Fields supplied when creating a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author_id: ActorId,
    pub title: String,
    pub content: String,
    pub categories: Vec<String>,
}

/// Comment on a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: ActorId,
    pub author_name: String,
    pub body: String,
    pub counts: ReactionCounts,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    #[inline]
    pub fn target(&self) -> ReactionTarget {
        ReactionTarget::comment(self.id, self.post_id)
    }
}

/// Fields supplied when creating a comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_id: PostId,
    pub author_id: ActorId,
    pub body: String,
}
