//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

use validator::ValidationErrors;

pub use requests::{
    CreateCommentRequest, CreatePostRequest, LoginRequest, RegisterRequest, SetReactionRequest,
};
pub use responses::{
    ApiResponse, AuthResponse, CommentResponse, HealthChecks, HealthResponse, PostDetailResponse,
    PostResponse, ReactionResponse, ReadinessResponse, UserResponse,
};

/// Flatten field errors into one message, ordered by field name
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: {}", e.code),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}
