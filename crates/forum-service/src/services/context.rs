//! Service context - dependency container for services
//!
//! Holds the repositories, the clock, and session settings needed by services.

use std::sync::Arc;

use chrono::Duration;
use forum_core::clock::{Clock, SystemClock};
use forum_core::traits::{
    CommentRepository, PostRepository, ReactionRepository, SessionRepository, UserRepository,
};
use forum_db::{
    MemoryStore, PgCommentRepository, PgPool, PgPostRepository, PgReactionRepository,
    PgSessionRepository, PgUserRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Default lifetime of an issued session
pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 3600;

/// Service context containing all dependencies
///
/// Cheap to clone; every dependency sits behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool (absent on the in-memory store)
    pool: Option<PgPool>,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    post_repo: Arc<dyn PostRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    session_repo: Arc<dyn SessionRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,

    // Time and session settings
    clock: Arc<dyn Clock>,
    session_ttl: Duration,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Database Pool ===

    /// Get the PostgreSQL connection pool, if the context runs on one
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn session_repo(&self) -> &dyn SessionRepository {
        self.session_repo.as_ref()
    }

    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    // === Time ===

    /// Clock used for session expiry
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Lifetime of an issued session
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("repositories", &"...")
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    session_repo: Option<Arc<dyn SessionRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    clock: Option<Arc<dyn Clock>>,
    session_ttl: Duration,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            user_repo: None,
            post_repo: None,
            comment_repo: None,
            session_repo: None,
            reaction_repo: None,
            clock: None,
            session_ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECONDS),
        }
    }

    /// Wire every repository to PostgreSQL
    pub fn postgres(mut self, pool: PgPool) -> Self {
        self.user_repo = Some(Arc::new(PgUserRepository::new(pool.clone())));
        self.post_repo = Some(Arc::new(PgPostRepository::new(pool.clone())));
        self.comment_repo = Some(Arc::new(PgCommentRepository::new(pool.clone())));
        self.session_repo = Some(Arc::new(PgSessionRepository::new(pool.clone())));
        self.reaction_repo = Some(Arc::new(PgReactionRepository::new(pool.clone())));
        self.pool = Some(pool);
        self
    }

    /// Wire every repository to one in-memory store
    pub fn memory(mut self, store: Arc<MemoryStore>) -> Self {
        self.user_repo = Some(store.clone());
        self.post_repo = Some(store.clone());
        self.comment_repo = Some(store.clone());
        self.session_repo = Some(store.clone());
        self.reaction_repo = Some(store);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn session_repo(mut self, repo: Arc<dyn SessionRepository>) -> Self {
        self.session_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Build the ServiceContext
    ///
    /// The clock defaults to the system clock.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a repository is missing or the
    /// session lifetime is not positive
    pub fn build(self) -> ServiceResult<ServiceContext> {
        if self.session_ttl <= Duration::zero() {
            return Err(ServiceError::validation("session_ttl must be positive"));
        }

        Ok(ServiceContext {
            pool: self.pool,
            user_repo: self
                .user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            post_repo: self
                .post_repo
                .ok_or_else(|| ServiceError::validation("post_repo is required"))?,
            comment_repo: self
                .comment_repo
                .ok_or_else(|| ServiceError::validation("comment_repo is required"))?,
            session_repo: self
                .session_repo
                .ok_or_else(|| ServiceError::validation("session_repo is required"))?,
            reaction_repo: self
                .reaction_repo
                .ok_or_else(|| ServiceError::validation("reaction_repo is required"))?,
            clock: self
                .clock
                .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>),
            session_ttl: self.session_ttl,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
