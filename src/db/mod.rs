//! Database layer: pool and the Postgres-backed store.

mod pool;
mod repositories;

pub use pool::{create_pool, ensure_schema, DbPool};
pub use repositories::PgStore;
