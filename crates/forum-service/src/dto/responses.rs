//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use forum_core::entities::{ReactionCounts, ReactionState, ReactionTarget};
use forum_core::value_objects::{ActorId, CommentId, PostId};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Login response carrying the session token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    /// Seconds until expiry
    pub expires_in: i64,
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn new(
        token: String,
        expires_at: DateTime<Utc>,
        expires_in: i64,
        user: UserResponse,
    ) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_at,
            expires_in,
            user,
        }
    }
}

// ============================================================================
// User Responses
// ============================================================================

/// User profile
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: ActorId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Post Responses
// ============================================================================

/// Post with its counters, and the viewer's reaction when there is a viewer
#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: PostId,
    pub author_id: ActorId,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub categories: Vec<String>,
    pub like_count: i64,
    pub dislike_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_reaction: Option<ReactionState>,
    pub created_at: DateTime<Utc>,
}

/// Comment with its counters
#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: ActorId,
    pub author_name: String,
    pub body: String,
    pub like_count: i64,
    pub dislike_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_reaction: Option<ReactionState>,
    pub created_at: DateTime<Utc>,
}

/// A post page
#[derive(Debug, Clone, Serialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

// ============================================================================
// Reaction Responses
// ============================================================================

/// Result of setting a reaction
#[derive(Debug, Clone, Serialize)]
pub struct ReactionResponse {
    pub target: ReactionTarget,
    pub reaction: ReactionState,
    pub like_count: i64,
    pub dislike_count: i64,
    pub changed: bool,
}

impl ReactionResponse {
    pub fn counts(&self) -> ReactionCounts {
        ReactionCounts::new(self.like_count, self.dislike_count)
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    /// Readiness of a PostgreSQL-backed deployment
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    /// Readiness of the in-memory store, which is always ready
    pub fn in_memory() -> Self {
        Self {
            status: "ready".to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: "in_memory".to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
