use crate::model::repo::ResourceTyped;
use crate::model::{error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Quiz {
    id: Uuid,
    module_id: Uuid,
    title: String,
    passing_score: i32,
    max_attempts: i32,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct QuizCreate {
    pub module_id: Uuid,
    pub title: String,
    pub passing_score: i32,
    pub max_attempts: i32,
}

impl ResourceTyped for Quiz {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Quiz
    }
}

impl Quiz {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn module_id(&self) -> Uuid {
        self.module_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn passing_score(&self) -> i32 {
        self.passing_score
    }

    pub fn max_attempts(&self) -> i32 {
        self.max_attempts
    }

    pub fn is_passing(&self, score: f64) -> bool {
        score >= f64::from(self.passing_score)
    }
}

#[async_trait]
impl CrudRepository<Quiz, QuizCreate, Uuid> for Quiz {
    async fn create(conn: &mut PgConnection, data: QuizCreate) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO quizzes (id, module_id, title, passing_score, max_attempts)
            VALUES ($1,$2,$3,$4,$5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.module_id)
        .bind(&data.title)
        .bind(data.passing_score)
        .bind(data.max_attempts)
        .fetch_one(&mut *conn)
        .await?;

        Ok(row)
    }

    async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM quizzes WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(result)
    }

    async fn list(conn: &mut PgConnection, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM quizzes ORDER BY module_id, title LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *conn)
            .await?;
        Ok(result)
    }

    async fn count(conn: &mut PgConnection) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quizzes")
            .fetch_one(&mut *conn)
            .await?;

        Ok(result)
    }
}

impl Quiz {
    pub async fn count_by_course(conn: &mut PgConnection, course_id: Uuid) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM quizzes q
            JOIN course_modules m ON m.id = q.module_id
            WHERE m.course_id = $1
            "#,
        )
        .bind(course_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(result)
    }
}

// Utils

/// Every quiz of a course together with whether the enrollment has at least one passing
/// attempt on it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct QuizPassRow {
    pub quiz_id: Uuid,
    pub quiz_title: String,
    pub module_title: String,
    pub passing_score: i32,
    pub passed: bool,
}

impl QuizPassRow {
    pub async fn fetch_all(
        conn: &mut PgConnection,
        course_id: Uuid,
        enrollment_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                q.id AS quiz_id,
                q.title AS quiz_title,
                m.title AS module_title,
                q.passing_score,
                EXISTS (
                    SELECT 1 FROM quiz_attempts a
                    WHERE a.quiz_id = q.id
                    AND a.enrollment_id = $2
                    AND a.passed
                ) AS passed
            FROM quizzes q
            JOIN course_modules m ON m.id = q.module_id
            WHERE m.course_id = $1
            ORDER BY m.position, q.title
            "#,
        )
        .bind(course_id)
        .bind(enrollment_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }
}
