//! Reaction database models

use sqlx::FromRow;

/// Denormalized counters stored on a post or comment row
#[derive(Debug, Clone, Copy, FromRow)]
pub struct CountersModel {
    pub like_count: i64,
    pub dislike_count: i64,
}

/// Membership of one actor in both relations of a target
#[derive(Debug, Clone, Copy, FromRow)]
pub struct MembershipModel {
    pub liked: bool,
    pub disliked: bool,
}
