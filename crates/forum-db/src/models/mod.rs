//! Database models - SQLx-compatible structs for PostgreSQL tables

mod post;
mod reaction;
mod user;

pub use post::{CommentModel, PostModel};
pub use reaction::{CountersModel, MembershipModel};
pub use user::{CredentialsModel, UserModel};
