//! Repository ports

mod repositories;

pub use repositories::{
    CommentRepository, PostRepository, ReactionRepository, RepoResult, SessionRepository,
    UserRepository,
};
