//! Test fixtures and data generators
//!
//! Request bodies the tests send and the response shapes they read back.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Short unique suffix, so repeated runs against one database never collide
pub fn unique_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

/// Registration request
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            username: format!("user_{suffix}"),
            email: format!("user_{suffix}@example.com"),
            password: "TestPass123!".to_string(),
        }
    }
}

/// Login request
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }
}

/// Create post request
#[derive(Debug, Serialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub categories: Vec<String>,
}

impl CreatePostRequest {
    pub fn unique() -> Self {
        Self {
            title: format!("Post {}", unique_suffix()),
            content: "Integration test content".to_string(),
            categories: vec!["testing".to_string()],
        }
    }
}

/// Create comment request
#[derive(Debug, Serialize)]
pub struct CreateCommentRequest {
    pub body: String,
}

/// Set reaction request
#[derive(Debug, Serialize)]
pub struct SetReactionRequest {
    pub reaction: &'static str,
}

impl SetReactionRequest {
    pub fn like() -> Self {
        Self { reaction: "like" }
    }

    pub fn dislike() -> Self {
        Self { reaction: "dislike" }
    }

    pub fn none() -> Self {
        Self { reaction: "none" }
    }
}

/// User response
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Login response
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Post response
#[derive(Debug, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub categories: Vec<String>,
    pub like_count: i64,
    pub dislike_count: i64,
    pub viewer_reaction: Option<String>,
}

/// Comment response
#[derive(Debug, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub body: String,
    pub like_count: i64,
    pub dislike_count: i64,
    pub viewer_reaction: Option<String>,
}

/// Post page response
#[derive(Debug, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

/// Reaction response
#[derive(Debug, Deserialize)]
pub struct ReactionResponse {
    pub reaction: String,
    pub like_count: i64,
    pub dislike_count: i64,
    pub changed: bool,
}

/// Error body
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
