use serde::Deserialize;

use crate::services::quiz_scoring::Answers;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct TakeQuizBody {
    /// Question id to answer: an option id for multiple choice, text otherwise.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub answers: Answers,
}
