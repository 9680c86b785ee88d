use crate::model::repo::ResourceTyped;
use crate::model::{error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use super::EnrollmentStatus;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Course {
    id: Uuid,
    title: String,
    description: String,
    instructor: String,
    level: String,
    duration_hours: i32,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CourseCreate {
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub level: String,
    pub duration_hours: i32,
}

impl ResourceTyped for Course {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Course
    }
}

impl Course {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn instructor(&self) -> &str {
        &self.instructor
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn duration_hours(&self) -> i32 {
        self.duration_hours
    }
}

#[async_trait]
impl CrudRepository<Course, CourseCreate, Uuid> for Course {
    async fn create(conn: &mut PgConnection, data: CourseCreate) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO courses (id, title, description, instructor, level, duration_hours)
            VALUES ($1,$2,$3,$4,$5,$6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.instructor)
        .bind(&data.level)
        .bind(data.duration_hours)
        .fetch_one(&mut *conn)
        .await?;

        Ok(row)
    }

    async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(result)
    }

    async fn list(conn: &mut PgConnection, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses ORDER BY created_at, title LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *conn)
            .await?;
        Ok(result)
    }

    async fn count(conn: &mut PgConnection) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(&mut *conn)
            .await?;

        Ok(result)
    }
}

// Utils

/// Course as seen from one student's catalog: enrollment columns are `NULL` when the
/// student never enrolled.
#[derive(Debug, sqlx::FromRow)]
pub struct CatalogRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub level: String,
    pub duration_hours: i32,
    pub modules_count: i64,
    pub status: Option<EnrollmentStatus>,
    pub progress_percentage: Option<f64>,
}

impl CatalogRow {
    pub async fn fetch_page(
        conn: &mut PgConnection,
        student_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                c.id,
                c.title,
                c.description,
                c.instructor,
                c.level,
                c.duration_hours,
                (SELECT COUNT(*) FROM course_modules m WHERE m.course_id = c.id) AS modules_count,
                e.status,
                e.progress_percentage
            FROM courses c
            LEFT JOIN enrollments e
                ON e.course_id = c.id
                AND e.student_id = $1
            ORDER BY c.created_at, c.title
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(student_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }
}
