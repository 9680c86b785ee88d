use crate::model::repo::ResourceTyped;
use crate::model::{error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct CourseModule {
    id: Uuid,
    course_id: Uuid,
    title: String,
    position: i32,
    video_url: String,
    duration_seconds: i32,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CourseModuleCreate {
    pub course_id: Uuid,
    pub title: String,
    pub position: Option<i32>,
    pub video_url: String,
    pub duration_seconds: i32,
}

impl ResourceTyped for CourseModule {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Module
    }
}

impl CourseModule {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    pub fn duration_seconds(&self) -> i32 {
        self.duration_seconds
    }
}

#[async_trait]
impl CrudRepository<CourseModule, CourseModuleCreate, Uuid> for CourseModule {
    async fn create(conn: &mut PgConnection, data: CourseModuleCreate) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO course_modules (id, course_id, title, position, video_url, duration_seconds)
            VALUES ($1,$2,$3,$4,$5,$6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.course_id)
        .bind(&data.title)
        .bind(data.position.unwrap_or(0))
        .bind(&data.video_url)
        .bind(data.duration_seconds)
        .fetch_one(&mut *conn)
        .await?;

        Ok(row)
    }

    async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM course_modules WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(result)
    }

    async fn list(conn: &mut PgConnection, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM course_modules ORDER BY course_id, position LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await?;
        Ok(result)
    }

    async fn count(conn: &mut PgConnection) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM course_modules")
            .fetch_one(&mut *conn)
            .await?;

        Ok(result)
    }
}

impl CourseModule {
    pub async fn count_by_course(conn: &mut PgConnection, course_id: Uuid) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM course_modules WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(result)
    }
}

// Utils

/// One module of a course joined with the student's view of it, if any.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct ModuleProgressRow {
    pub module_id: Uuid,
    pub title: String,
    pub position: i32,
    pub watched_percentage: f64,
    pub completed: bool,
    pub last_watched: Option<chrono::DateTime<chrono::Utc>>,
}

impl ModuleProgressRow {
    pub async fn fetch_all(
        conn: &mut PgConnection,
        course_id: Uuid,
        enrollment_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                m.id AS module_id,
                m.title,
                m.position,
                COALESCE(v.watched_percentage, 0) AS watched_percentage,
                COALESCE(v.completed, FALSE) AS completed,
                v.last_watched_at AS last_watched
            FROM course_modules m
            LEFT JOIN video_views v
                ON v.module_id = m.id
                AND v.enrollment_id = $2
            WHERE m.course_id = $1
            ORDER BY m.position, m.title
            "#,
        )
        .bind(course_id)
        .bind(enrollment_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }
}
