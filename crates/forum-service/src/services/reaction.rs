//! Reaction engine
//!
//! One engine for every target kind. Writes go through
//! [`ReactionRepository::apply`](forum_core::ReactionRepository::apply), which
//! moves membership and counters together in a single atomic unit. Reads are
//! best-effort: a failed lookup shows no reaction instead of failing the page.

use forum_core::entities::{
    CounterAudit, MembershipSet, Polarity, ReactionOutcome, ReactionState, ReactionTarget,
};
use forum_core::value_objects::ActorId;
use tracing::{debug, error, info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Reaction engine
pub struct ReactionEngine<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionEngine<'a> {
    /// Create a new ReactionEngine
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Move `actor_id` to the `desired` polarity on `target`.
    ///
    /// Repeating the current polarity is a no-op. Storage failures propagate
    /// and leave the previously committed state untouched.
    #[instrument(skip(self), fields(target = %target))]
    pub async fn set_reaction(
        &self,
        actor_id: ActorId,
        target: ReactionTarget,
        desired: Polarity,
    ) -> ServiceResult<ReactionOutcome> {
        let outcome = self
            .ctx
            .reaction_repo()
            .apply(actor_id, target, desired)
            .await?;

        if outcome.changed {
            info!(
                actor_id = %actor_id,
                reaction = desired.as_str(),
                likes = outcome.counts.likes,
                dislikes = outcome.counts.dislikes,
                "Reaction set"
            );
        } else {
            debug!(actor_id = %actor_id, reaction = desired.as_str(), "Reaction unchanged");
        }

        Ok(outcome)
    }

    /// Whether `actor_id` likes `target`; `false` when the lookup fails
    pub async fn has_liked(&self, actor_id: ActorId, target: ReactionTarget) -> bool {
        self.is_member(actor_id, target, MembershipSet::Likers).await
    }

    /// Whether `actor_id` dislikes `target`; `false` when the lookup fails
    pub async fn has_disliked(&self, actor_id: ActorId, target: ReactionTarget) -> bool {
        self.is_member(actor_id, target, MembershipSet::Dislikers)
            .await
    }

    /// Current reaction of `actor_id` on `target`, best-effort.
    ///
    /// A failed lookup or a conflicting pair of memberships reads as neutral.
    #[instrument(skip(self), fields(target = %target))]
    pub async fn reaction_state(&self, actor_id: ActorId, target: ReactionTarget) -> ReactionState {
        let membership = match self.ctx.reaction_repo().membership(actor_id, target).await {
            Ok(membership) => membership,
            Err(e) => {
                warn!(error = %e, "Reaction lookup failed, showing no reaction");
                return ReactionState::Neutral;
            }
        };

        membership.state().unwrap_or_else(|_| {
            error!(
                actor_id = %actor_id,
                "Invariant violation: actor both likes and dislikes target"
            );
            ReactionState::Neutral
        })
    }

    /// Compare stored counters against membership cardinality
    #[instrument(skip(self), fields(target = %target))]
    pub async fn verify_counters(&self, target: ReactionTarget) -> ServiceResult<CounterAudit> {
        let audit = self.ctx.reaction_repo().audit(target).await?;

        if !audit.is_consistent() {
            error!(
                stored_likes = audit.stored.likes,
                actual_likes = audit.actual.likes,
                stored_dislikes = audit.stored.dislikes,
                actual_dislikes = audit.actual.dislikes,
                "Reaction counters drifted from membership"
            );
        }

        Ok(audit)
    }

    async fn is_member(
        &self,
        actor_id: ActorId,
        target: ReactionTarget,
        set: MembershipSet,
    ) -> bool {
        match self.ctx.reaction_repo().is_member(actor_id, target, set).await {
            Ok(found) => found,
            Err(e) => {
                warn!(target = %target, error = %e, "Membership lookup failed, reading as absent");
                false
            }
        }
    }
}
