//! # room-db
//!
//! Storage layer implementing the repository traits of `room-core`.
//!
//! ## Overview
//!
//! - Connection pool management and embedded migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - PostgreSQL repository implementations
//! - [`MemoryStore`], an in-process backend with the same constraints
//!
//! ## Usage
//!
//! ```rust,ignore
//! use room_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use room_db::repositories::PgRoomRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::new("postgres://localhost/rooms")).await?;
//!     run_migrations(&pool).await?;
//!     let rooms = PgRoomRepository::new(pool);
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
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgInviteTokenRepository, PgParticipantRepository, PgRoomRepository, PgUserRepository,
};
