use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::QuizSubmission;

/// Record of an admin disclosing a submission's score to its student.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SentResult {
    pub id: String,
    pub submission_id: String,
    pub student_id: String,
    pub course_id: String,
    pub sent_by: String,
    pub sender_name: String,
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub score: Option<u8>,
}

impl SentResult {
    pub fn for_submission(submission: &QuizSubmission, sent_by: &str, sender_name: &str) -> Self {
        SentResult {
            id: Uuid::new_v4().to_string(),
            submission_id: submission.id.clone(),
            student_id: submission.student_id.clone(),
            course_id: submission.course_id.clone(),
            sent_by: sent_by.to_string(),
            sender_name: sender_name.to_string(),
            sent_at: Utc::now(),
            score: Some(submission.score),
        }
    }
}
