use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use crate::model::{DatabaseResult, ResourceTyped};

/// One scored submission. Rows are insert-only, a trigger rejects updates.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizAttempt {
    id: Uuid,
    enrollment_id: Uuid,
    quiz_id: Uuid,
    attempt_number: i32,
    score: f64,
    passed: bool,
    answers_data: Json<serde_json::Value>,
    attempted_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct QuizAttemptCreate {
    pub enrollment_id: Uuid,
    pub quiz_id: Uuid,
    pub attempt_number: i32,
    pub score: f64,
    pub passed: bool,
    pub answers_data: serde_json::Value,
}

impl ResourceTyped for QuizAttempt {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::QuizAttempt
    }
}

impl QuizAttempt {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn enrollment_id(&self) -> Uuid {
        self.enrollment_id
    }

    pub fn quiz_id(&self) -> Uuid {
        self.quiz_id
    }

    pub fn attempt_number(&self) -> i32 {
        self.attempt_number
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn answers_data(&self) -> &serde_json::Value {
        &self.answers_data.0
    }
}

impl QuizAttempt {
    pub async fn create(conn: &mut PgConnection, data: QuizAttemptCreate) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO quiz_attempts
                (id, enrollment_id, quiz_id, attempt_number, score, passed, answers_data)
            VALUES ($1,$2,$3,$4,$5,$6,$7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.enrollment_id)
        .bind(data.quiz_id)
        .bind(data.attempt_number)
        .bind(data.score)
        .bind(data.passed)
        .bind(Json(data.answers_data))
        .fetch_one(&mut *conn)
        .await?;

        Ok(row)
    }

    pub async fn count_for(
        conn: &mut PgConnection,
        enrollment_id: Uuid,
        quiz_id: Uuid,
    ) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM quiz_attempts WHERE enrollment_id = $1 AND quiz_id = $2",
        )
        .bind(enrollment_id)
        .bind(quiz_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(result)
    }
}

// Utils

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct AttemptReportRow {
    pub quiz_id: Uuid,
    pub quiz_title: String,
    pub module_title: String,
    pub score: f64,
    pub passed: bool,
    pub attempt_number: i32,
    pub attempted_at: DateTime<Utc>,
    pub passing_score: i32,
}

impl AttemptReportRow {
    pub async fn fetch_all(conn: &mut PgConnection, enrollment_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                a.quiz_id,
                q.title AS quiz_title,
                m.title AS module_title,
                a.score,
                a.passed,
                a.attempt_number,
                a.attempted_at,
                q.passing_score
            FROM quiz_attempts a
            JOIN quizzes q ON q.id = a.quiz_id
            JOIN course_modules m ON m.id = q.module_id
            WHERE a.enrollment_id = $1
            ORDER BY a.attempted_at DESC, a.attempt_number DESC
            "#,
        )
        .bind(enrollment_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }
}
