//! PostgreSQL implementation of ReactionRepository
//!
//! Both target kinds share one code path. [`TargetTables`] maps a kind to its
//! row table and its two membership tables; every statement is built from
//! those static names.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use forum_core::entities::{
    CounterAudit, Membership, MembershipSet, Polarity, ReactionCounts, ReactionOutcome,
    ReactionTarget, TargetKind,
};
use forum_core::error::DomainError;
use forum_core::traits::{ReactionRepository, RepoResult};
use forum_core::value_objects::ActorId;

use crate::models::{CountersModel, MembershipModel};

use super::error::map_db_error;

/// Storage keys of one target kind
#[derive(Debug, Clone, Copy)]
struct TargetTables {
    /// Table holding the target rows and their counters
    rows: &'static str,
    /// Column tying a row to its post (`id` for posts themselves)
    parent: &'static str,
    likes: &'static str,
    dislikes: &'static str,
    /// Target key column in the membership tables
    key: &'static str,
}

const POST_TABLES: TargetTables = TargetTables {
    rows: "posts",
    parent: "id",
    likes: "post_likes",
    dislikes: "post_dislikes",
    key: "post_id",
};

const COMMENT_TABLES: TargetTables = TargetTables {
    rows: "comments",
    parent: "post_id",
    likes: "comment_likes",
    dislikes: "comment_dislikes",
    key: "comment_id",
};

impl TargetTables {
    fn for_kind(kind: TargetKind) -> Self {
        match kind {
            TargetKind::Post => POST_TABLES,
            TargetKind::Comment => COMMENT_TABLES,
        }
    }

    fn membership(&self, set: MembershipSet) -> &'static str {
        match set {
            MembershipSet::Likers => self.likes,
            MembershipSet::Dislikers => self.dislikes,
        }
    }

    fn counter(set: MembershipSet) -> &'static str {
        match set {
            MembershipSet::Likers => "like_count",
            MembershipSet::Dislikers => "dislike_count",
        }
    }
}

/// PostgreSQL implementation of ReactionRepository
///
/// `apply` locks the target row with `SELECT ... FOR UPDATE` before reading
/// membership, so concurrent updates on the same target run one after another
/// and the counters move with the membership rows inside one transaction.
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn lock_target(
        tx: &mut Transaction<'static, Postgres>,
        tables: TargetTables,
        target: ReactionTarget,
    ) -> RepoResult<()> {
        let sql = format!(
            "SELECT id FROM {} WHERE id = $1 AND {} = $2 FOR UPDATE",
            tables.rows, tables.parent
        );
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(target.raw_id())
            .bind(target.post_id().into_inner())
            .fetch_optional(&mut **tx)
            .await
            .map_err(map_db_error("reaction.apply"))?
            .ok_or_else(|| DomainError::target_not_found(target))?;
        Ok(())
    }

    async fn read_membership<'e, E>(
        executor: E,
        tables: TargetTables,
        actor_id: ActorId,
        target: ReactionTarget,
        operation: &'static str,
    ) -> RepoResult<Membership>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT \
                EXISTS(SELECT 1 FROM {likes} WHERE {key} = $1 AND actor_id = $2) AS liked, \
                EXISTS(SELECT 1 FROM {dislikes} WHERE {key} = $1 AND actor_id = $2) AS disliked",
            likes = tables.likes,
            dislikes = tables.dislikes,
            key = tables.key,
        );
        let model = sqlx::query_as::<_, MembershipModel>(&sql)
            .bind(target.raw_id())
            .bind(actor_id.into_inner())
            .fetch_one(executor)
            .await
            .map_err(map_db_error(operation))?;
        Ok(Membership::from(model))
    }

    async fn read_counts<'e, E>(
        executor: E,
        tables: TargetTables,
        target: ReactionTarget,
        operation: &'static str,
    ) -> RepoResult<ReactionCounts>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT like_count, dislike_count FROM {} WHERE id = $1 AND {} = $2",
            tables.rows, tables.parent
        );
        let model = sqlx::query_as::<_, CountersModel>(&sql)
            .bind(target.raw_id())
            .bind(target.post_id().into_inner())
            .fetch_optional(executor)
            .await
            .map_err(map_db_error(operation))?
            .ok_or_else(|| DomainError::target_not_found(target))?;
        Ok(ReactionCounts::from(model))
    }

    /// Remove one membership row and decrement its counter by the rows removed
    async fn remove(
        tx: &mut Transaction<'static, Postgres>,
        tables: TargetTables,
        actor_id: ActorId,
        target: ReactionTarget,
        set: MembershipSet,
    ) -> RepoResult<()> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = $1 AND actor_id = $2",
            tables.membership(set),
            tables.key
        );
        let removed = sqlx::query(&sql)
            .bind(target.raw_id())
            .bind(actor_id.into_inner())
            .execute(&mut **tx)
            .await
            .map_err(map_db_error("reaction.apply"))?
            .rows_affected();

        if removed > 0 {
            let counter = TargetTables::counter(set);
            let sql = format!(
                "UPDATE {} SET {counter} = GREATEST({counter} - $2, 0) WHERE id = $1",
                tables.rows
            );
            sqlx::query(&sql)
                .bind(target.raw_id())
                .bind(removed as i64)
                .execute(&mut **tx)
                .await
                .map_err(map_db_error("reaction.apply"))?;
        }
        Ok(())
    }

    /// Insert one membership row and increment its counter only if it was new
    async fn insert(
        tx: &mut Transaction<'static, Postgres>,
        tables: TargetTables,
        actor_id: ActorId,
        target: ReactionTarget,
        set: MembershipSet,
    ) -> RepoResult<()> {
        let sql = format!(
            "INSERT INTO {} ({}, actor_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            tables.membership(set),
            tables.key
        );
        let inserted = sqlx::query(&sql)
            .bind(target.raw_id())
            .bind(actor_id.into_inner())
            .execute(&mut **tx)
            .await
            .map_err(map_db_error("reaction.apply"))?
            .rows_affected();

        if inserted > 0 {
            let counter = TargetTables::counter(set);
            let sql = format!(
                "UPDATE {} SET {counter} = {counter} + 1 WHERE id = $1",
                tables.rows
            );
            sqlx::query(&sql)
                .bind(target.raw_id())
                .execute(&mut **tx)
                .await
                .map_err(map_db_error("reaction.apply"))?;
        }
        Ok(())
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self), fields(target = %target))]
    async fn apply(
        &self,
        actor_id: ActorId,
        target: ReactionTarget,
        desired: Polarity,
    ) -> RepoResult<ReactionOutcome> {
        let tables = TargetTables::for_kind(target.kind());
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_error("reaction.apply"))?;

        Self::lock_target(&mut tx, tables, target).await?;

        let membership =
            Self::read_membership(&mut *tx, tables, actor_id, target, "reaction.apply").await?;
        let transition = membership.plan(desired);

        if transition.is_noop() {
            debug!("Reaction already in requested state");
        }

        for set in transition.removals() {
            Self::remove(&mut tx, tables, actor_id, target, set).await?;
        }
        if let Some(set) = transition.insert {
            Self::insert(&mut tx, tables, actor_id, target, set).await?;
        }

        let counts = Self::read_counts(&mut *tx, tables, target, "reaction.apply").await?;
        tx.commit().await.map_err(map_db_error("reaction.apply"))?;

        Ok(ReactionOutcome {
            target,
            state: desired.resulting_state(),
            counts,
            changed: !transition.is_noop(),
        })
    }

    #[instrument(skip(self), fields(target = %target))]
    async fn membership(
        &self,
        actor_id: ActorId,
        target: ReactionTarget,
    ) -> RepoResult<Membership> {
        let tables = TargetTables::for_kind(target.kind());
        Self::read_membership(&self.pool, tables, actor_id, target, "reaction.membership").await
    }

    #[instrument(skip(self), fields(target = %target))]
    async fn is_member(
        &self,
        actor_id: ActorId,
        target: ReactionTarget,
        set: MembershipSet,
    ) -> RepoResult<bool> {
        let tables = TargetTables::for_kind(target.kind());
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1 AND actor_id = $2)",
            tables.membership(set),
            tables.key
        );
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(target.raw_id())
            .bind(actor_id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error("reaction.is_member"))
    }

    #[instrument(skip(self), fields(target = %target))]
    async fn counts(&self, target: ReactionTarget) -> RepoResult<ReactionCounts> {
        let tables = TargetTables::for_kind(target.kind());
        Self::read_counts(&self.pool, tables, target, "reaction.counts").await
    }

    #[instrument(skip(self), fields(target = %target))]
    async fn audit(&self, target: ReactionTarget) -> RepoResult<CounterAudit> {
        let tables = TargetTables::for_kind(target.kind());
        let stored = Self::read_counts(&self.pool, tables, target, "reaction.audit").await?;

        let sql = format!(
            "SELECT \
                (SELECT COUNT(*) FROM {likes} WHERE {key} = $1) AS like_count, \
                (SELECT COUNT(*) FROM {dislikes} WHERE {key} = $1) AS dislike_count",
            likes = tables.likes,
            dislikes = tables.dislikes,
            key = tables.key,
        );
        let actual = sqlx::query_as::<_, CountersModel>(&sql)
            .bind(target.raw_id())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error("reaction.audit"))?;

        Ok(CounterAudit {
            target,
            stored,
            actual: ReactionCounts::from(actual),
        })
    }
}
