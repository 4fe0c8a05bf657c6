//! # forum-core
//!
//! Domain layer containing ids, entities, the reaction algebra, the clock
//! abstraction, and repository traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod clock;
pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use clock::{Clock, ManualClock, SystemClock};
pub use entities::{
    Comment, CounterAudit, Credentials, Membership, MembershipConflict, MembershipSet,
    NewComment, NewPost, NewUser, Polarity, Post, ReactionCounts, ReactionOutcome, ReactionState,
    ReactionTarget, Session, TargetKind, Transition, User,
};
pub use error::DomainError;
pub use traits::{
    CommentRepository, PostRepository, ReactionRepository, RepoResult, SessionRepository,
    UserRepository,
};
pub use value_objects::{ActorId, CommentId, IdParseError, PostId};
