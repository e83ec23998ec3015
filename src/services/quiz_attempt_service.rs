use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        quiz_submission::score_answers, AttemptState, QuizCourse, QuizSubmission,
    },
    repositories::QuizSubmissionRepository,
};

/// Drives a student's attempt at a course and persists the graded result.
pub struct QuizAttemptService {
    submissions: Arc<dyn QuizSubmissionRepository>,
}

impl QuizAttemptService {
    pub fn new(submissions: Arc<dyn QuizSubmissionRepository>) -> Self {
        Self { submissions }
    }

    /// The student's completed submission for a course, if any.
    pub async fn existing_submission(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> AppResult<Option<QuizSubmission>> {
        self.submissions.find_submission(student_id, course_id).await
    }

    pub async fn start_attempt(
        &self,
        course: &QuizCourse,
        student_id: &str,
    ) -> AppResult<AttemptState> {
        if self.existing_submission(student_id, &course.id).await?.is_some() {
            return Err(AppError::AlreadySubmitted);
        }
        if !course.is_takeable() {
            return Err(AppError::EmptyCourse);
        }

        log::debug!("Student {} started quiz course {}", student_id, course.id);
        Ok(AttemptState::new(student_id, &course.id, course.question_count()))
    }

    /// Grades and stores the attempt. The attempt is only marked submitted
    /// once the store has accepted the submission.
    pub async fn submit(
        &self,
        state: &mut AttemptState,
        course: &QuizCourse,
    ) -> AppResult<QuizSubmission> {
        state.ensure_in_progress()?;

        if state.course_id != course.id {
            return Err(AppError::ValidationError(format!(
                "Attempt belongs to quiz course '{}', not '{}'",
                state.course_id, course.id
            )));
        }
        if state.question_count() != course.question_count() {
            return Err(AppError::ValidationError(
                "The quiz changed while it was being taken, please start again".to_string(),
            ));
        }

        let answers = state.answers().to_vec();
        let score = score_answers(&answers, &course.questions);
        let submission = QuizSubmission::new(&state.student_id, &course.id, answers, score);

        let submission = self.submissions.insert_submission(submission).await?;
        state.mark_submitted(&submission.id, submission.score);

        log::info!(
            "Student {} submitted quiz course {} with score {}% ({} unanswered)",
            submission.student_id,
            submission.course_id,
            submission.score,
            submission.unanswered_count()
        );

        Ok(submission)
    }
}
