//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize`; those carrying user input also
//! implement `Validate`.

use forum_core::entities::{Polarity, MAX_COMMENT_LENGTH, MAX_TITLE_LENGTH};

use serde::Deserialize;
use validator::{Validate, ValidationError};

// validator's `length` bounds are `u64`; mirror the core limits in that type.
const MAX_TITLE_LENGTH_U64: u64 = MAX_TITLE_LENGTH as u64;
const MAX_COMMENT_LENGTH_U64: u64 = MAX_COMMENT_LENGTH as u64;

// ============================================================================
// Auth Requests
// ============================================================================

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

// ============================================================================
// Post Requests
// ============================================================================

/// Create post request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(
        custom(function = "not_blank", message = "Title must not be blank"),
        length(max = MAX_TITLE_LENGTH_U64, message = "Title must be at most 100 characters")
    )]
    pub title: String,

    #[validate(custom(function = "not_blank", message = "Content must not be blank"))]
    pub content: String,

    #[validate(custom(function = "has_category", message = "At least one category is required"))]
    pub categories: Vec<String>,
}

/// Create comment request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(
        custom(function = "not_blank", message = "Comment must not be blank"),
        length(max = MAX_COMMENT_LENGTH_U64, message = "Comment must be at most 100 characters")
    )]
    pub body: String,
}

// ============================================================================
// Reaction Requests
// ============================================================================

/// Set reaction request: `{"reaction": "like" | "dislike" | "none"}`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SetReactionRequest {
    pub reaction: Polarity,
}

// ============================================================================
// Custom validators
// ============================================================================

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn has_category(categories: &[String]) -> Result<(), ValidationError> {
    if categories.iter().all(|c| c.trim().is_empty()) {
        return Err(ValidationError::new("no_category"));
    }
    Ok(())
}
