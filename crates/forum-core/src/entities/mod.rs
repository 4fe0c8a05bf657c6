//! Domain entities - core business objects

mod post;
mod reaction;
mod session;
mod user;

pub use post::{Comment, NewComment, NewPost, Post, MAX_COMMENT_LENGTH, MAX_TITLE_LENGTH};
pub use reaction::{
    CounterAudit, Membership, MembershipConflict, MembershipSet, Polarity, ReactionCounts,
    ReactionOutcome, ReactionState, ReactionTarget, TargetKind, Transition,
};
pub use session::{is_expired_at, Session};
pub use user::{normalize_email, Credentials, NewUser, User};
