use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::{DatabaseResult, ResourceTyped};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct QuizOption {
    id: Uuid,
    question_id: Uuid,
    text: String,
    is_correct: bool,
}

#[derive(Debug)]
pub struct QuizOptionCreate {
    pub question_id: Uuid,
    pub text: String,
    pub is_correct: bool,
}

impl ResourceTyped for QuizOption {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::QuizOption
    }
}

impl QuizOption {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn question_id(&self) -> Uuid {
        self.question_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[cfg(test)]
    pub fn new(question_id: Uuid, text: &str, is_correct: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            question_id,
            text: text.to_string(),
            is_correct,
        }
    }
}

impl QuizOption {
    pub async fn create(conn: &mut PgConnection, data: QuizOptionCreate) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO quiz_options (id, question_id, text, is_correct)
            VALUES ($1,$2,$3,$4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.question_id)
        .bind(&data.text)
        .bind(data.is_correct)
        .fetch_one(&mut *conn)
        .await?;

        Ok(row)
    }

    /// Options of every question of the quiz, grouped by question.
    pub async fn all_by_quiz(conn: &mut PgConnection, quiz_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT o.*
            FROM quiz_options o
            JOIN quiz_questions q ON q.id = o.question_id
            WHERE q.quiz_id = $1
            ORDER BY q.position, o.id
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }
}
