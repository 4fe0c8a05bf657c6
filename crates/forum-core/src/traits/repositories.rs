//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs and the infrastructure layer
//! provides the implementation. Every store (PostgreSQL or in-memory) must
//! honor the atomicity contract documented on [`ReactionRepository::apply`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    Comment, CounterAudit, Credentials, Membership, MembershipSet, NewComment, NewPost, NewUser,
    Polarity, Post, ReactionCounts, ReactionOutcome, ReactionTarget, Session, User,
};
use crate::error::DomainError;
use crate::value_objects::{ActorId, CommentId, PostId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: ActorId) -> RepoResult<Option<User>>;

    /// Look up stored credentials by (normalized) email
    async fn find_credentials_by_email(&self, email: &str) -> RepoResult<Option<Credentials>>;

    /// Create a new user.
    ///
    /// Fails with `EmailAlreadyExists` or `UsernameAlreadyExists` on a
    /// uniqueness conflict.
    async fn create(&self, user: &NewUser) -> RepoResult<User>;
}

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find post by ID
    async fn find_by_id(&self, id: PostId) -> RepoResult<Option<Post>>;

    /// Most recent posts, newest first
    async fn latest(&self, limit: i64) -> RepoResult<Vec<Post>>;

    /// Posts written by an actor, newest first
    async fn find_by_author(&self, author_id: ActorId) -> RepoResult<Vec<Post>>;

    /// Posts an actor currently likes, newest first
    async fn find_liked_by(&self, actor_id: ActorId) -> RepoResult<Vec<Post>>;

    /// Create a new post with zeroed counters
    async fn create(&self, post: &NewPost) -> RepoResult<Post>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find comment by ID
    async fn find_by_id(&self, id: CommentId) -> RepoResult<Option<Comment>>;

    /// Comments under a post, oldest first
    async fn find_by_post(&self, post_id: PostId) -> RepoResult<Vec<Comment>>;

    /// Create a comment. Fails with `PostNotFound` if the post is missing.
    async fn create(&self, comment: &NewComment) -> RepoResult<Comment>;
}

// ============================================================================
// Session Repository
// ============================================================================

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Store a session, replacing any session already held by the same actor
    async fn upsert(&self, session: &Session) -> RepoResult<()>;

    /// Actor owning a token, regardless of expiry
    async fn find_actor(&self, token: &str) -> RepoResult<Option<ActorId>>;

    /// Stored expiry of a token
    async fn find_expiry(&self, token: &str) -> RepoResult<Option<DateTime<Utc>>>;

    /// Remove a token. Returns whether a row was removed.
    async fn delete(&self, token: &str) -> RepoResult<bool>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Move an actor's reaction on a target to `desired`.
    ///
    /// The membership read, the planned removals and insert, and the matching
    /// counter adjustments run as one atomic unit serialized per target. The
    /// counters change by exactly the number of membership rows removed or
    /// inserted. A missing target yields `PostNotFound` / `CommentNotFound`
    /// and nothing is written.
    async fn apply(
        &self,
        actor_id: ActorId,
        target: ReactionTarget,
        desired: Polarity,
    ) -> RepoResult<ReactionOutcome>;

    /// Raw membership of an actor in both relations
    async fn membership(&self, actor_id: ActorId, target: ReactionTarget)
        -> RepoResult<Membership>;

    /// Membership of an actor in one relation
    async fn is_member(
        &self,
        actor_id: ActorId,
        target: ReactionTarget,
        set: MembershipSet,
    ) -> RepoResult<bool>;

    /// Stored counters of a target
    async fn counts(&self, target: ReactionTarget) -> RepoResult<ReactionCounts>;

    /// Stored counters next to the actual membership cardinality
    async fn audit(&self, target: ReactionTarget) -> RepoResult<CounterAudit>;
}
