//! # forum-db
//!
//! Database layer implementing the forum-core repository traits.
//!
//! - PostgreSQL repositories over SQLx, with the reaction transition running
//!   in one transaction behind a row lock on the target
//! - Database models with SQLx `FromRow` derives and model to entity mappers
//! - The forum schema and connection pool helpers
//! - [`MemoryStore`], an in-process implementation of every port
//!
//! ## Usage
//!
//! ```rust,ignore
//! use forum_db::pool::{create_pool, run_migrations, PoolConfig};
//! use forum_db::repositories::PgReactionRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::new(std::env::var("DATABASE_URL")?)).await?;
//!     run_migrations(&pool).await?;
//!     let reactions = PgReactionRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, ping, run_migrations, PgPool, PoolConfig};
pub use repositories::{
    PgCommentRepository, PgPostRepository, PgReactionRepository, PgSessionRepository,
    PgUserRepository,
};
