use serde::Serialize;
use thiserror::Error;

use crate::model::{DatabaseError, ResourceType};

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Coarse class of a failure, what the HTTP layer maps to a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    PreconditionFailed,
    ValidationError,
    Internal,
}

/// Why a student cannot be certified for a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub enum IneligibleReason {
    #[serde(rename = "course not completed")]
    CourseNotCompleted,
    #[serde(rename = "quizzes not passed")]
    QuizzesNotPassed,
    #[serde(rename = "already certified")]
    AlreadyCertified,
}

impl std::fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CourseNotCompleted => write!(f, "course not completed"),
            Self::QuizzesNotPassed => write!(f, "quizzes not passed"),
            Self::AlreadyCertified => write!(f, "already certified"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("maximum attempts reached ({max})")]
    MaxAttemptsReached { max: i32 },
    #[error("not eligible: {0}")]
    Ineligible(IneligibleReason),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {resource_type:?}")]
    NotFound { resource_type: ResourceType },

    #[error("not enrolled in this course")]
    NotEnrolled,

    #[error("{0}")]
    Precondition(#[from] Precondition),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(value: sqlx::Error) -> Self {
        Self::Database(DatabaseError::from(value))
    }
}

impl ServiceError {
    pub fn not_found(resource_type: ResourceType) -> Self {
        Self::NotFound { resource_type }
    }

    pub fn ineligible(reason: IneligibleReason) -> Self {
        Self::Precondition(Precondition::Ineligible(reason))
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } | Self::NotEnrolled => ErrorKind::NotFound,
            Self::Precondition(_) => ErrorKind::PreconditionFailed,
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::Database(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to show to a client. Internal causes stay in the logs.
    pub fn client_reason(&self) -> String {
        match self {
            Self::NotFound { resource_type } => {
                format!("{} not found", resource_label(*resource_type))
            }
            Self::NotEnrolled => String::from("not enrolled in this course"),
            Self::Precondition(p) => p.to_string(),
            Self::Validation(message) => message.clone(),
            Self::Database(_) => String::from("internal error"),
        }
    }
}

fn resource_label(resource_type: ResourceType) -> &'static str {
    match resource_type {
        ResourceType::User => "user",
        ResourceType::Wallet => "wallet",
        ResourceType::Course => "course",
        ResourceType::Module => "module",
        ResourceType::Quiz => "quiz",
        ResourceType::Question => "question",
        ResourceType::QuizOption => "option",
        ResourceType::Enrollment => "enrollment",
        ResourceType::VideoView => "video view",
        ResourceType::QuizAttempt => "quiz attempt",
        ResourceType::Certificate => "certificate",
        ResourceType::CertificateToken => "certificate token",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            ServiceError::not_found(ResourceType::Quiz).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(ServiceError::NotEnrolled.kind(), ErrorKind::NotFound);
        assert_eq!(
            ServiceError::from(Precondition::MaxAttemptsReached { max: 1 }).kind(),
            ErrorKind::PreconditionFailed
        );
        assert_eq!(
            ServiceError::validation("module_id is required").kind(),
            ErrorKind::ValidationError
        );
        assert_eq!(
            ServiceError::from(sqlx::Error::RowNotFound).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn client_reasons_are_readable() {
        assert_eq!(
            ServiceError::from(Precondition::MaxAttemptsReached { max: 3 }).client_reason(),
            "maximum attempts reached (3)"
        );
        assert_eq!(
            ServiceError::ineligible(IneligibleReason::AlreadyCertified).client_reason(),
            "not eligible: already certified"
        );
        assert_eq!(
            ServiceError::not_found(ResourceType::Module).client_reason(),
            "module not found"
        );
    }

    #[test]
    fn internal_causes_are_hidden() {
        let err = ServiceError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.client_reason(), "internal error");
    }

    #[test]
    fn reasons_serialize_as_sentences() {
        let json = serde_json::to_string(&IneligibleReason::QuizzesNotPassed).unwrap();
        assert_eq!(json, "\"quizzes not passed\"");
    }
}
