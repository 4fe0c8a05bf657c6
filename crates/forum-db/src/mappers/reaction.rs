//! Reaction model mappers

use forum_core::entities::{Membership, ReactionCounts};

use crate::models::{CountersModel, MembershipModel};

impl From<CountersModel> for ReactionCounts {
    fn from(model: CountersModel) -> Self {
        ReactionCounts::new(model.like_count, model.dislike_count)
    }
}

impl From<MembershipModel> for Membership {
    fn from(model: MembershipModel) -> Self {
        Membership::new(model.liked, model.disliked)
    }
}
