//! Reaction algebra - targets, polarities, membership state, and transitions
//!
//! An actor's reaction to a target is recorded as membership in one of two
//! disjoint sets, `Likers` and `Dislikers`. Every store plans a change with
//! [`Membership::plan`] and then applies the resulting [`Transition`] inside a
//! single atomic unit, adjusting the target's counters by exactly the rows it
//! inserted or removed.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{CommentId, PostId};

/// Kind of entity a reaction applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Post,
    Comment,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity a reaction applies to
///
/// Comments carry their parent post so that a reaction addressed through the
/// wrong post is rejected rather than silently applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReactionTarget {
    Post { id: PostId },
    Comment { id: CommentId, post_id: PostId },
}

impl ReactionTarget {
    /// Target a post
    pub fn post(id: PostId) -> Self {
        Self::Post { id }
    }

    /// Target a comment under `post_id`
    pub fn comment(id: CommentId, post_id: PostId) -> Self {
        Self::Comment { id, post_id }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Post { .. } => TargetKind::Post,
            Self::Comment { .. } => TargetKind::Comment,
        }
    }

    /// Raw row id of the target itself (post id or comment id)
    pub fn raw_id(&self) -> i64 {
        match self {
            Self::Post { id } => id.into_inner(),
            Self::Comment { id, .. } => id.into_inner(),
        }
    }

    /// Post the target belongs to (the post itself for post targets)
    pub fn post_id(&self) -> PostId {
        match self {
            Self::Post { id } => *id,
            Self::Comment { post_id, .. } => *post_id,
        }
    }
}

impl fmt::Display for ReactionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post { id } => write!(f, "post:{id}"),
            Self::Comment { id, post_id } => write!(f, "comment:{id}@post:{post_id}"),
        }
    }
}

/// Desired reaction requested by an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Like,
    Dislike,
    None,
}

impl Polarity {
    /// State the actor ends up in once this polarity is applied
    pub fn resulting_state(self) -> ReactionState {
        match self {
            Self::Like => ReactionState::Liked,
            Self::Dislike => ReactionState::Disliked,
            Self::None => ReactionState::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current reaction of one actor to one target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionState {
    Liked,
    Disliked,
    #[default]
    Neutral,
}

impl ReactionState {
    #[inline]
    pub fn is_liked(&self) -> bool {
        matches!(self, Self::Liked)
    }

    #[inline]
    pub fn is_disliked(&self) -> bool {
        matches!(self, Self::Disliked)
    }
}

/// One of the two membership relations kept per target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipSet {
    Likers,
    Dislikers,
}

/// Raw membership of an actor in both relations, as read from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Membership {
    pub liked: bool,
    pub disliked: bool,
}

/// Both memberships were present for one (actor, target) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("actor is both a liker and a disliker of the same target")]
pub struct MembershipConflict;

impl Membership {
    pub fn new(liked: bool, disliked: bool) -> Self {
        Self { liked, disliked }
    }

    /// Collapse raw membership into a state
    pub fn state(&self) -> Result<ReactionState, MembershipConflict> {
        match (self.liked, self.disliked) {
            (true, true) => Err(MembershipConflict),
            (true, false) => Ok(ReactionState::Liked),
            (false, true) => Ok(ReactionState::Disliked),
            (false, false) => Ok(ReactionState::Neutral),
        }
    }

    /// Plan the row changes that move this membership to `desired`
    ///
    /// Planning works on raw membership rather than on the collapsed state, so
    /// a conflicting pair is repaired toward `desired` instead of compounding.
    pub fn plan(&self, desired: Polarity) -> Transition {
        match desired {
            Polarity::Like => Transition {
                remove_likers: false,
                remove_dislikers: self.disliked,
                insert: (!self.liked).then_some(MembershipSet::Likers),
            },
            Polarity::Dislike => Transition {
                remove_likers: self.liked,
                remove_dislikers: false,
                insert: (!self.disliked).then_some(MembershipSet::Dislikers),
            },
            Polarity::None => Transition {
                remove_likers: self.liked,
                remove_dislikers: self.disliked,
                insert: None,
            },
        }
    }
}

/// Row changes needed for one reaction update
///
/// Removals always run before the insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transition {
    pub remove_likers: bool,
    pub remove_dislikers: bool,
    pub insert: Option<MembershipSet>,
}

impl Transition {
    /// No rows change
    pub fn is_noop(&self) -> bool {
        !self.remove_likers && !self.remove_dislikers && self.insert.is_none()
    }

    /// Sets the actor must be removed from, in application order
    pub fn removals(&self) -> impl Iterator<Item = MembershipSet> {
        [
            self.remove_likers.then_some(MembershipSet::Likers),
            self.remove_dislikers.then_some(MembershipSet::Dislikers),
        ]
        .into_iter()
        .flatten()
    }
}

/// Denormalized counters stored on a target row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReactionCounts {
    pub likes: i64,
    pub dislikes: i64,
}

impl ReactionCounts {
    pub fn new(likes: i64, dislikes: i64) -> Self {
        Self { likes, dislikes }
    }

    /// Counter for one membership set
    pub fn get(&self, set: MembershipSet) -> i64 {
        match set {
            MembershipSet::Likers => self.likes,
            MembershipSet::Dislikers => self.dislikes,
        }
    }

    /// Adjust one counter, never going below zero
    pub fn adjust(&mut self, set: MembershipSet, delta: i64) {
        let counter = match set {
            MembershipSet::Likers => &mut self.likes,
            MembershipSet::Dislikers => &mut self.dislikes,
        };
        *counter = (*counter + delta).max(0);
    }
}

/// Result of applying a reaction update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReactionOutcome {
    pub target: ReactionTarget,
    pub state: ReactionState,
    pub counts: ReactionCounts,
    /// False when the request matched the stored state and nothing was written
    pub changed: bool,
}

/// Stored counters compared with the actual membership cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CounterAudit {
    pub target: ReactionTarget,
    pub stored: ReactionCounts,
    pub actual: ReactionCounts,
}

impl CounterAudit {
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.stored == self.actual
    }
}
