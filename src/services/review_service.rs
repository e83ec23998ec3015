use std::sync::Arc;

use crate::{
    auth::{require_admin, require_self_or_admin, require_session, SessionManager},
    errors::{AppError, AppResult},
    models::{
        domain::SentResult,
        dto::response::{SubmissionReview, UserDto},
    },
    repositories::{QuizSubmissionRepository, UserRepository},
};

/// Admin review of submissions and disclosure of scores to students.
pub struct ReviewService {
    submissions: Arc<dyn QuizSubmissionRepository>,
    users: Arc<dyn UserRepository>,
    sessions: Arc<SessionManager>,
}

impl ReviewService {
    pub fn new(
        submissions: Arc<dyn QuizSubmissionRepository>,
        users: Arc<dyn UserRepository>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            submissions,
            users,
            sessions,
        }
    }

    /// Newest first. Submissions from removed accounts are kept with no student.
    pub async fn submissions_for_course(
        &self,
        course_id: &str,
    ) -> AppResult<Vec<SubmissionReview>> {
        require_admin(self.sessions.get())?;

        let submissions = self.submissions.list_submissions_for_course(course_id).await?;
        let mut reviews = Vec::with_capacity(submissions.len());
        for submission in submissions {
            let student = self
                .users
                .find_by_id(&submission.student_id)
                .await?
                .map(UserDto::from);
            reviews.push(SubmissionReview { submission, student });
        }

        Ok(reviews)
    }

    pub async fn send_result(&self, submission_id: &str) -> AppResult<SentResult> {
        let admin = require_admin(self.sessions.get())?;

        let submission = self
            .submissions
            .find_by_id(submission_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Submission with id '{}' not found", submission_id))
            })?;

        let sent = SentResult::for_submission(&submission, admin.user_id(), &admin.user.name);
        let sent = self.submissions.record_sent_result(sent).await?;
        log::info!(
            "Admin '{}' sent result of submission {} to student {}",
            admin.user.username,
            submission.id,
            submission.student_id
        );

        Ok(sent)
    }

    /// Results disclosed to a student, newest first. Students may only read their own.
    pub async fn results_for_student(&self, student_id: &str) -> AppResult<Vec<SentResult>> {
        let session = require_session(self.sessions.get())?;
        require_self_or_admin(&session, student_id)?;
        self.submissions.list_sent_results_for_student(student_id).await
    }
}
