//! Session manager
//!
//! Issues, resolves, expires, and revokes opaque session tokens. An actor holds
//! at most one token; issuing a new one replaces the old row, which logs the
//! actor out everywhere else.

use forum_common::generate_session_token;
use forum_core::entities::{is_expired_at, Session};
use forum_core::value_objects::ActorId;
use tracing::{debug, info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Session manager
pub struct SessionManager<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SessionManager<'a> {
    /// Create a new SessionManager
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Issue a fresh token for `actor_id`, superseding any previous one
    #[instrument(skip(self))]
    pub async fn issue(&self, actor_id: ActorId) -> ServiceResult<Session> {
        let session = Session {
            actor_id,
            token: generate_session_token(),
            expires_at: self.ctx.clock().now() + self.ctx.session_ttl(),
        };

        self.ctx.session_repo().upsert(&session).await?;

        info!(actor_id = %actor_id, expires_at = %session.expires_at, "Session issued");
        Ok(session)
    }

    /// Actor owning `token`, or `None` if the token is unknown.
    ///
    /// Expiry is not checked here; see [`Self::is_expired`].
    #[instrument(skip_all)]
    pub async fn resolve(&self, token: &str) -> ServiceResult<Option<ActorId>> {
        let actor = self.ctx.session_repo().find_actor(token).await?;
        if actor.is_none() {
            debug!("Session token not found");
        }
        Ok(actor)
    }

    /// Whether `token` has expired. A token without an expiry record counts
    /// as expired.
    #[instrument(skip_all)]
    pub async fn is_expired(&self, token: &str) -> ServiceResult<bool> {
        let expired = match self.ctx.session_repo().find_expiry(token).await? {
            Some(expires_at) => is_expired_at(expires_at, self.ctx.clock().now()),
            None => true,
        };
        Ok(expired)
    }

    /// Invalidate `token`. Unknown or already revoked tokens are a no-op.
    #[instrument(skip_all)]
    pub async fn revoke(&self, token: &str) -> ServiceResult<()> {
        if self.ctx.session_repo().delete(token).await? {
            info!("Session revoked");
        } else {
            debug!("Revoke on unknown session token");
        }
        Ok(())
    }
}
