mod database;
pub use database::DbConnection;

pub mod entity;

mod error;
pub use error::{DatabaseError, DatabaseResult};

mod repo;
pub use repo::{CrudRepository, Page, ResourceType, ResourceTyped};

use sqlx::{Postgres, Transaction, pool::PoolConnection};

/// Entry point to storage. Repositories never reach for a connection on their own,
/// callers hand them one from [`ModelManager::begin`] or [`ModelManager::acquire`].
#[derive(Debug, Clone)]
pub struct ModelManager {
    database: DbConnection,
}

impl ModelManager {
    pub fn new(conn: DbConnection) -> Self {
        Self { database: conn }
    }

    /// Opens a unit of work. Dropping it without `commit` rolls everything back.
    pub async fn begin(&self) -> DatabaseResult<Transaction<'static, Postgres>> {
        Ok(self.database.pool().begin().await?)
    }

    /// Plain pooled connection for read paths.
    pub async fn acquire(&self) -> DatabaseResult<PoolConnection<Postgres>> {
        Ok(self.database.pool().acquire().await?)
    }
}
