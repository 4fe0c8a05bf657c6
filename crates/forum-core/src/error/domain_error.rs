//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::entities::ReactionTarget;
use crate::value_objects::{ActorId, CommentId, PostId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(ActorId),

    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Username already in use")]
    UsernameAlreadyExists,

    // =========================================================================
    // Consistency Errors
    // =========================================================================
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Storage error in {operation}: {message}")]
    Storage {
        operation: &'static str,
        message: String,
    },
}

impl DomainError {
    /// Storage failure tagged with the failing operation
    pub fn storage(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Storage {
            operation,
            message: message.into(),
        }
    }

    /// Not-found error for a reaction target
    pub fn target_not_found(target: ReactionTarget) -> Self {
        match target {
            ReactionTarget::Post { id } => Self::PostNotFound(id),
            ReactionTarget::Comment { id, .. } => Self::CommentNotFound(id),
        }
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::UsernameAlreadyExists => "USERNAME_ALREADY_EXISTS",

            // Consistency
            Self::InvariantViolation(_) => "INVARIANT_VIOLATION",

            // Infrastructure
            Self::Storage { .. } => "STORAGE_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_) | Self::PostNotFound(_) | Self::CommentNotFound(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyExists | Self::UsernameAlreadyExists)
    }
}
