use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{QuizSubmission, User, UserRole, UserStatus};

/// A user without its credential, safe to hand to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub username: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            name: user.name,
            email: user.email,
            username: user.username,
            role: user.role,
            status: user.status,
            created_at: user.created_at,
        }
    }
}

/// One row of the admin submission review: the submission and, when the
/// account still exists, the student who made it.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReview {
    pub submission: QuizSubmission,
    pub student: Option<UserDto>,
}

impl SubmissionReview {
    pub fn student_name(&self) -> &str {
        self.student
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or("Deleted account")
    }
}
