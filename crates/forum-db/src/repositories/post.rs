//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use forum_core::entities::{NewPost, Post};
use forum_core::error::DomainError;
use forum_core::traits::{PostRepository, RepoResult};
use forum_core::value_objects::{ActorId, PostId};

use crate::models::PostModel;

use super::error::map_db_error;

/// Post columns joined with the author name and the sorted category list
const POST_SELECT: &str = r"
    SELECT p.id, p.author_id, u.username AS author_name, p.title, p.content,
           ARRAY(
               SELECT c.category FROM post_categories c
               WHERE c.post_id = p.id
               ORDER BY c.category
           ) AS categories,
           p.like_count, p.dislike_count, p.created_at
    FROM posts p
    JOIN users u ON u.id = p.author_id
";

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new PgPostRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: PostId) -> RepoResult<Option<Post>> {
        let sql = format!("{POST_SELECT} WHERE p.id = $1");
        let result = sqlx::query_as::<_, PostModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error("post.find_by_id"))?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self))]
    async fn latest(&self, limit: i64) -> RepoResult<Vec<Post>> {
        let limit = limit.clamp(1, 100);
        let sql = format!("{POST_SELECT} ORDER BY p.created_at DESC, p.id DESC LIMIT $1");
        let results = sqlx::query_as::<_, PostModel>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error("post.latest"))?;

        Ok(results.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_author(&self, author_id: ActorId) -> RepoResult<Vec<Post>> {
        let sql = format!(
            "{POST_SELECT} WHERE p.author_id = $1 ORDER BY p.created_at DESC, p.id DESC"
        );
        let results = sqlx::query_as::<_, PostModel>(&sql)
            .bind(author_id.into_inner())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error("post.find_by_author"))?;

        Ok(results.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_liked_by(&self, actor_id: ActorId) -> RepoResult<Vec<Post>> {
        let sql = format!(
            "{POST_SELECT} JOIN post_likes l ON l.post_id = p.id \
             WHERE l.actor_id = $1 ORDER BY p.created_at DESC, p.id DESC"
        );
        let results = sqlx::query_as::<_, PostModel>(&sql)
            .bind(actor_id.into_inner())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error("post.find_liked_by"))?;

        Ok(results.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self, post), fields(author_id = %post.author_id))]
    async fn create(&self, post: &NewPost) -> RepoResult<Post> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_error("post.create"))?;

        let id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO posts (author_id, title, content)
            VALUES ($1, $2, $3)
            RETURNING id
            ",
        )
        .bind(post.author_id.into_inner())
        .bind(&post.title)
        .bind(&post.content)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error("post.create"))?;

        for category in &post.categories {
            sqlx::query(
                r"
                INSERT INTO post_categories (post_id, category)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                ",
            )
            .bind(id)
            .bind(category)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error("post.create"))?;
        }

        tx.commit().await.map_err(map_db_error("post.create"))?;

        let id = PostId::new(id);
        self.find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }
}
