//! # curator-db
//!
//! Database layer implementing the repository traits with PostgreSQL via SQLx,
//! plus an in-memory store with the same semantics.
//!
//! ## Overview
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - PostgreSQL repository implementations; decisions commit in one
//!   transaction that starts with a conditional `UPDATE ... WHERE status = 'pending'`
//! - [`InMemoryStore`], used by tests and local runs without a database
//!
//! ## Usage
//!
//! ```rust,ignore
//! use curator_db::{connect, PgSubmissionRepository, PoolSettings};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = connect(&PoolSettings::new("postgres://localhost/curator", 10, 1)).await?;
//!     let submissions = PgSubmissionRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::InMemoryStore;
pub use pool::{connect, run_migrations, PgPool, PoolError, PoolSettings};
pub use repositories::{
    PgApplicationRepository, PgAuditLogRepository, PgFaqRepository, PgGameRepository,
    PgSubmissionRepository, PgUserRepository,
};
