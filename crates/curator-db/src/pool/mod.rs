//! Connection pool and migrations

mod postgres;

pub use postgres::{connect, run_migrations, PoolError, PoolSettings};

pub use sqlx::postgres::PgPool;
