//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in forum-core.

mod comment;
mod error;
mod post;
mod reaction;
mod session;
mod user;

pub use comment::PgCommentRepository;
pub use post::PgPostRepository;
pub use reaction::PgReactionRepository;
pub use session::PgSessionRepository;
pub use user::PgUserRepository;
