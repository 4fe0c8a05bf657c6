//! Axum extractors for request handling
//!
//! Custom extractors for sessions, path ids, and JSON bodies.

mod path;
mod session;
mod validated;

pub use path::{CommentPath, IdPath, PostPath};
pub use session::{AuthUser, MaybeAuthUser, SessionToken};
pub use validated::{JsonBody, ValidatedJson};
