//! Session entity - an issued bearer token and its expiry

use chrono::{DateTime, Utc};

use crate::value_objects::ActorId;

/// Live session row. At most one exists per actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub actor_id: ActorId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Expired once `now` reaches `expires_at`
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        is_expired_at(self.expires_at, now)
    }
}

/// Expiry check shared by every session store
#[inline]
pub fn is_expired_at(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expires_at <= now
}
