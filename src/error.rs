//! Progress Error Types
//!
//! 진행 상태 계산기 전역 에러 타입 정의

use serde::Serialize;
use thiserror::Error;

/// 진행 상태 계산 에러
#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Course not found: {0}")]
    CourseNotFound(String),

    #[error("Part not found: {0}")]
    PartNotFound(String),

    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Lesson not found: {0}")]
    LessonNotFound(String),

    #[error("Answer {answer_id} not found for question {question_id}")]
    AnswerNotFound { question_id: i64, answer_id: i64 },

    /// 자식이 있어야 하는 파트/버킷이 비어 있음 (저작 데이터 손상)
    #[error("Structural inconsistency: {0}")]
    StructuralInconsistency(String),

    #[error("Question {question_id} already answered by user {user_id}")]
    AlreadyAnswered { user_id: i64, question_id: i64 },

    #[error("Operation canceled")]
    Canceled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Database lock poisoned: {0}")]
    LockPoisoned(String),
}

impl ProgressError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ProgressError::CourseNotFound(_)
                | ProgressError::PartNotFound(_)
                | ProgressError::BucketNotFound(_)
                | ProgressError::LessonNotFound(_)
                | ProgressError::AnswerNotFound { .. }
        )
    }

    /// 호출자가 그대로 재시도해도 안전한 에러인지 여부
    ///
    /// 모든 쓰기가 멱등이므로 취소/기한 초과는 재시도 가능합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProgressError::Canceled | ProgressError::DeadlineExceeded)
    }
}

pub type ProgressResult<T> = Result<T, ProgressError>;

/// 전송 계층 응답용 직렬화 가능한 에러
#[derive(Debug, Serialize)]
pub struct CommandError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl From<ProgressError> for CommandError {
    fn from(error: ProgressError) -> Self {
        let code = match &error {
            ProgressError::Database(_)
            | ProgressError::Io(_)
            | ProgressError::Serialization(_)
            | ProgressError::Config(_)
            | ProgressError::LockPoisoned(_)
            | ProgressError::StructuralInconsistency(_) => "INTERNAL_ERROR",
            ProgressError::CourseNotFound(_)
            | ProgressError::PartNotFound(_)
            | ProgressError::BucketNotFound(_)
            | ProgressError::LessonNotFound(_)
            | ProgressError::AnswerNotFound { .. } => "NOT_FOUND",
            ProgressError::AlreadyAnswered { .. } => "ALREADY_ANSWERED",
            ProgressError::Canceled => "CANCELED",
            ProgressError::DeadlineExceeded => "DEADLINE_EXCEEDED",
            ProgressError::InvalidOperation(_) => "INVALID_OPERATION",
        };

        // 내부 에러는 id나 SQL 메시지를 응답에 싣지 않는다
        let message = if code == "INTERNAL_ERROR" {
            tracing::error!(error = %error, "internal error surfaced at command boundary");
            "Internal server error".to_string()
        } else {
            error.to_string()
        };

        CommandError {
            code: code.to_string(),
            message,
            details: None,
        }
    }
}

/// 명령 결과 타입
pub type CommandResult<T> = Result<T, CommandError>;
