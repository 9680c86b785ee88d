use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::{DatabaseResult, ResourceTyped};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema)]
#[sqlx(type_name = "question_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiple_choice" => Ok(Self::MultipleChoice),
            "true_false" => Ok(Self::TrueFalse),
            "short_answer" => Ok(Self::ShortAnswer),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Question {
    id: Uuid,
    quiz_id: Uuid,
    text: String,
    question_type: QuestionType,
    position: i32,
}

#[derive(Debug)]
pub struct QuestionCreate {
    pub quiz_id: Uuid,
    pub text: String,
    pub question_type: QuestionType,
    pub position: i32,
}

impl ResourceTyped for Question {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Question
    }
}

impl Question {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn quiz_id(&self) -> Uuid {
        self.quiz_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    #[cfg(test)]
    pub fn new(id: Uuid, quiz_id: Uuid, question_type: QuestionType) -> Self {
        Self {
            id,
            quiz_id,
            text: String::new(),
            question_type,
            position: 0,
        }
    }
}

impl Question {
    pub async fn create(conn: &mut PgConnection, data: QuestionCreate) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO quiz_questions (id, quiz_id, text, question_type, position)
            VALUES ($1,$2,$3,$4,$5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.quiz_id)
        .bind(&data.text)
        .bind(data.question_type)
        .bind(data.position)
        .fetch_one(&mut *conn)
        .await?;

        Ok(row)
    }

    pub async fn all_by_quiz(conn: &mut PgConnection, quiz_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            "SELECT * FROM quiz_questions WHERE quiz_id = $1 ORDER BY position, id",
        )
        .bind(quiz_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn question_type_parses_snake_case() {
        assert_eq!(
            "multiple_choice".parse::<QuestionType>(),
            Ok(QuestionType::MultipleChoice)
        );
        assert_eq!("true_false".parse::<QuestionType>(), Ok(QuestionType::TrueFalse));
        assert_eq!(
            "short_answer".parse::<QuestionType>(),
            Ok(QuestionType::ShortAnswer)
        );
        assert!("essay".parse::<QuestionType>().is_err());
    }
}
