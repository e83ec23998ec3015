use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Invalid credentials: no account matches that email/username and password")]
    InvalidCredentials,

    #[error("Your account is pending approval by an administrator")]
    PendingApproval,

    #[error("Your account registration has been rejected by an administrator")]
    Rejected,

    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("An account with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("You have already completed this quiz")]
    AlreadySubmitted,

    #[error("This quiz has no questions yet")]
    EmptyCourse,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::PendingApproval => "PENDING_APPROVAL",
            AppError::Rejected => "REJECTED",
            AppError::DuplicateUsername(_) => "DUPLICATE_USERNAME",
            AppError::DuplicateEmail(_) => "DUPLICATE_EMAIL",
            AppError::AlreadySubmitted => "ALREADY_SUBMITTED",
            AppError::EmptyCourse => "EMPTY_COURSE",
            AppError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// True for the failures a user can fix by changing what they typed.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AppError::InvalidCredentials
                | AppError::PendingApproval
                | AppError::Rejected
                | AppError::DuplicateUsername(_)
                | AppError::DuplicateEmail(_)
        )
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::StoreUnavailable(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON serialization error: {}", err))
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
    fn test_error_codes() {
        assert_eq!(AppError::PendingApproval.error_code(), "PENDING_APPROVAL");
        assert_eq!(
            AppError::DuplicateEmail("a@x.com".into()).error_code(),
            "DUPLICATE_EMAIL"
        );
        assert_eq!(
            AppError::StoreUnavailable("timeout".into()).error_code(),
            "STORE_UNAVAILABLE"
        );
    }

    #[test]
    fn test_auth_failures_have_distinct_messages() {
        let messages = [
            AppError::InvalidCredentials.to_string(),
            AppError::PendingApproval.to_string(),
            AppError::Rejected.to_string(),
            AppError::DuplicateUsername("a".into()).to_string(),
            AppError::DuplicateEmail("a@x.com".into()).to_string(),
        ];

        for (i, a) in messages.iter().enumerate() {
            for b in messages.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AppError::AlreadySubmitted.to_string(),
            "You have already completed this quiz"
        );
        assert_eq!(
            AppError::NotFound("course".into()).to_string(),
            "Not found: course"
        );
        assert!(AppError::Rejected.is_auth_failure());
        assert!(!AppError::EmptyCourse.is_auth_failure());
    }
}
