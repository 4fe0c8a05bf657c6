//! Access guard
//!
//! Turns an optional session token into an identity for the current request.
//! Resolution happens once per request and is never cached.

use forum_common::is_well_formed_token;
use forum_core::value_objects::ActorId;
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::session::SessionManager;

/// Who is making the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    Authenticated(ActorId),
}

impl Identity {
    pub fn actor_id(&self) -> Option<ActorId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(id) => Some(*id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Why an action endpoint turned the request away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    RedirectToLogin,
}

/// Result of [`AccessGuard::require_authenticated`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allowed(ActorId),
    Rejected(Rejection),
}

/// Access guard
pub struct AccessGuard<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccessGuard<'a> {
    /// Create a new AccessGuard
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve `token` to an identity.
    ///
    /// Unknown and expired tokens both read as anonymous; an expired token is
    /// revoked before returning. Storage failures propagate.
    #[instrument(skip_all)]
    pub async fn authorize(&self, token: Option<&str>) -> ServiceResult<Identity> {
        let Some(token) = token.filter(|t| is_well_formed_token(t)) else {
            return Ok(Identity::Anonymous);
        };

        let sessions = SessionManager::new(self.ctx);

        let Some(actor_id) = sessions.resolve(token).await? else {
            debug!("Unknown session token, treating request as anonymous");
            return Ok(Identity::Anonymous);
        };

        if sessions.is_expired(token).await? {
            warn!(actor_id = %actor_id, "Session expired, revoking");
            sessions.revoke(token).await?;
            return Ok(Identity::Anonymous);
        }

        Ok(Identity::Authenticated(actor_id))
    }

    /// Like [`Self::authorize`], but anonymous callers get a rejection the
    /// delivery layer turns into a redirect to the login page.
    pub async fn require_authenticated(&self, token: Option<&str>) -> ServiceResult<AuthDecision> {
        Ok(match self.authorize(token).await? {
            Identity::Authenticated(actor_id) => AuthDecision::Allowed(actor_id),
            Identity::Anonymous => AuthDecision::Rejected(Rejection::RedirectToLogin),
        })
    }
}
