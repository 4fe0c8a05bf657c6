//! Business logic services
//!
//! Session lifecycle, access control, reactions, and the forum use cases
//! built on top of them.

pub mod access;
pub mod auth;
pub mod context;
pub mod error;
pub mod post;
pub mod reaction;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export all services for convenience
pub use access::{AccessGuard, AuthDecision, Identity, Rejection};
pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder, DEFAULT_SESSION_TTL_SECONDS};
pub use error::{ServiceError, ServiceResult};
pub use post::{PostService, LATEST_POSTS_LIMIT};
pub use reaction::ReactionEngine;
pub use session::SessionManager;
