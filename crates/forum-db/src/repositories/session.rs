//! PostgreSQL implementation of SessionRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use forum_core::entities::Session;
use forum_core::traits::{RepoResult, SessionRepository};
use forum_core::value_objects::ActorId;

use super::error::map_db_error;

/// PostgreSQL implementation of SessionRepository
///
/// `sessions` is keyed by token and carries `UNIQUE (actor_id)`, so an upsert
/// on the actor replaces whatever token that actor held before.
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new PgSessionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    #[instrument(skip(self, session), fields(actor_id = %session.actor_id))]
    async fn upsert(&self, session: &Session) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO sessions (token, actor_id, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (actor_id) DO UPDATE
            SET token = EXCLUDED.token,
                expires_at = EXCLUDED.expires_at,
                created_at = NOW()
            ",
        )
        .bind(&session.token)
        .bind(session.actor_id.into_inner())
        .bind(session.expires_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error("session.issue"))?;

        Ok(())
    }

    #[instrument(skip_all)]
    async fn find_actor(&self, token: &str) -> RepoResult<Option<ActorId>> {
        let result = sqlx::query_scalar::<_, i64>(
            r"
            SELECT actor_id FROM sessions WHERE token = $1
            ",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("session.resolve"))?;

        Ok(result.map(ActorId::new))
    }

    #[instrument(skip_all)]
    async fn find_expiry(&self, token: &str) -> RepoResult<Option<DateTime<Utc>>> {
        let result = sqlx::query_scalar::<_, DateTime<Utc>>(
            r"
            SELECT expires_at FROM sessions WHERE token = $1
            ",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("session.is_expired"))?;

        Ok(result)
    }

    #[instrument(skip_all)]
    async fn delete(&self, token: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM sessions WHERE token = $1
            ",
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(map_db_error("session.revoke"))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgSessionRepository>();
    }
}
