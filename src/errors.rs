use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use mongodb::error::{ErrorKind, WriteFailure};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Quiz not active: {0}")]
    QuizNotActive(String),

    #[error("Duplicate submission: {0}")]
    DuplicateSubmission(String),

    #[error("Generation returned no questions")]
    EmptyGenerationResult,

    #[error("Generation response could not be parsed: {0}")]
    GenerationParseError(String),

    #[error("Generation transport failure: {0}")]
    GenerationTransportError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidStateTransition(_) => StatusCode::CONFLICT,
            AppError::QuizNotActive(_) => StatusCode::CONFLICT,
            AppError::DuplicateSubmission(_) => StatusCode::CONFLICT,
            AppError::EmptyGenerationResult => StatusCode::BAD_GATEWAY,
            AppError::GenerationParseError(_) => StatusCode::BAD_GATEWAY,
            AppError::GenerationTransportError(_) => StatusCode::BAD_GATEWAY,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.status_code().as_u16(),
        })
    }
}

/// A single-document insert that violates a unique index fails with write
/// error code 11000. The responses collection relies on this to enforce
/// at-most-once submission per (user, question).
pub fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    match *err.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) => write_error.code == 11000,
        _ => false,
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}
impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON serialization error: {}", err))
    }
}
impl From<mongodb::bson::de::Error> for AppError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        AppError::InternalError(format!("BSON deserialization error: {}", err))
    }
}
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::NotFound("test".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::DuplicateSubmission("test".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InvalidStateTransition("test".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::QuizNotActive("test".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::GenerationTransportError("test".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::ValidationError("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::QuizNotActive("quiz-1".into());
        assert_eq!(err.to_string(), "Quiz not active: quiz-1");

        let err = AppError::EmptyGenerationResult;
        assert_eq!(err.to_string(), "Generation returned no questions");
    }

    #[test]
    fn test_duplicate_key_detection_ignores_other_errors() {
        let err = mongodb::error::Error::custom("not a write error");
        assert!(!is_duplicate_key_error(&err));
    }
}
