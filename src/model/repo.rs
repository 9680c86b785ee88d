use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

use crate::model::error::DatabaseResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    User,
    Wallet,
    Course,
    Module,
    Quiz,
    Question,
    QuizOption,
    Enrollment,
    VideoView,
    QuizAttempt,
    Certificate,
    CertificateToken,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, limit: i64, offset: i64) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }
}

pub trait ResourceTyped {
    fn get_resource_type() -> ResourceType;
}

/// Basic persistence for catalog-like entities. Every call runs on the connection the
/// caller supplies, so the same functions work inside and outside a transaction.
#[async_trait::async_trait]
pub trait CrudRepository<T, Create, V>
where
    T: ResourceTyped,
    V: Clone + Copy,
{
    async fn create(conn: &mut PgConnection, data: Create) -> DatabaseResult<T>;

    async fn find_by_id(conn: &mut PgConnection, id: V) -> DatabaseResult<Option<T>>;

    async fn list(conn: &mut PgConnection, limit: i64, offset: i64) -> DatabaseResult<Vec<T>>;

    async fn count(conn: &mut PgConnection) -> DatabaseResult<i64>;
}
