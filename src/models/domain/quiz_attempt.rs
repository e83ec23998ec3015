use serde::{Deserialize, Serialize};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{quiz_course::OPTION_COUNT, quiz_submission::UNANSWERED},
};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AttemptStatus {
    InProgress,
    Submitted { submission_id: String, score: u8 },
}

/// A student's pass through one course's questions, held client-side until
/// it is submitted.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttemptState {
    pub student_id: String,
    pub course_id: String,
    cursor: usize,
    answers: Vec<i32>,
    status: AttemptStatus,
}

impl AttemptState {
    /// Starts at the first question with every answer unset. `question_count`
    /// must be non-zero.
    pub fn new(student_id: &str, course_id: &str, question_count: usize) -> Self {
        AttemptState {
            student_id: student_id.to_string(),
            course_id: course_id.to_string(),
            cursor: 0,
            answers: vec![UNANSWERED; question_count],
            status: AttemptStatus::InProgress,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn answers(&self) -> &[i32] {
        &self.answers
    }

    pub fn question_count(&self) -> usize {
        self.answers.len()
    }

    pub fn status(&self) -> &AttemptStatus {
        &self.status
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.status, AttemptStatus::Submitted { .. })
    }

    /// Records an answer for the current question without moving the cursor.
    pub fn select_answer(&mut self, option_index: usize) -> AppResult<()> {
        self.ensure_in_progress()?;
        if option_index >= OPTION_COUNT {
            return Err(AppError::ValidationError(format!(
                "Option index {} is out of range",
                option_index
            )));
        }
        self.answers[self.cursor] = option_index as i32;
        Ok(())
    }

    pub fn next_question(&mut self) -> AppResult<()> {
        self.ensure_in_progress()?;
        if !self.is_last() {
            self.cursor += 1;
        }
        Ok(())
    }

    pub fn previous_question(&mut self) -> AppResult<()> {
        self.ensure_in_progress()?;
        self.cursor = self.cursor.saturating_sub(1);
        Ok(())
    }

    pub fn current_answer(&self) -> Option<usize> {
        self.answers
            .get(self.cursor)
            .and_then(|a| usize::try_from(*a).ok())
    }

    pub fn is_current_answered(&self) -> bool {
        self.current_answer().is_some()
    }

    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_last(&self) -> bool {
        self.cursor + 1 >= self.answers.len()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| **a != UNANSWERED).count()
    }

    /// Position of the current question as a percentage of the course.
    pub fn progress(&self) -> u8 {
        if self.answers.is_empty() {
            return 0;
        }
        ((self.cursor + 1) * 100 / self.answers.len()) as u8
    }

    pub(crate) fn mark_submitted(&mut self, submission_id: &str, score: u8) {
        self.status = AttemptStatus::Submitted {
            submission_id: submission_id.to_string(),
            score,
        };
    }

    pub(crate) fn ensure_in_progress(&self) -> AppResult<()> {
        if self.is_submitted() {
            return Err(AppError::AlreadySubmitted);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_attempt_starts_unanswered_at_first_question() {
        let state = AttemptState::new("s-1", "c-1", 3);

        assert_eq!(state.cursor(), 0);
        assert_eq!(state.answers(), &[UNANSWERED; 3]);
        assert!(state.is_first());
        assert!(!state.is_current_answered());
        assert_eq!(state.status(), &AttemptStatus::InProgress);
    }

    #[test]
    fn test_navigation_clamps_at_both_ends() {
        let mut state = AttemptState::new("s-1", "c-1", 2);

        state.previous_question().unwrap();
        assert_eq!(state.cursor(), 0);

        state.next_question().unwrap();
        state.next_question().unwrap();
        assert_eq!(state.cursor(), 1);
        assert!(state.is_last());
        assert_eq!(state.progress(), 100);
    }

    #[test]
    fn test_select_answer_records_at_cursor_only() {
        let mut state = AttemptState::new("s-1", "c-1", 3);
        state.next_question().unwrap();
        state.select_answer(2).unwrap();
        state.select_answer(3).unwrap();

        assert_eq!(state.cursor(), 1);
        assert_eq!(state.answers(), &[UNANSWERED, 3, UNANSWERED]);
        assert_eq!(state.current_answer(), Some(3));
        assert_eq!(state.answered_count(), 1);
    }

    #[test]
    fn test_select_answer_rejects_out_of_range_option() {
        let mut state = AttemptState::new("s-1", "c-1", 1);

        assert!(matches!(
            state.select_answer(4),
            Err(AppError::ValidationError(_))
        ));
        assert_eq!(state.answers(), &[UNANSWERED]);
    }

    #[test]
    fn test_submitted_attempt_is_frozen() {
        let mut state = AttemptState::new("s-1", "c-1", 2);
        state.select_answer(1).unwrap();
        state.mark_submitted("sub-1", 50);

        assert_eq!(state.select_answer(0), Err(AppError::AlreadySubmitted));
        assert_eq!(state.next_question(), Err(AppError::AlreadySubmitted));
        assert_eq!(state.previous_question(), Err(AppError::AlreadySubmitted));
        assert_eq!(state.answers(), &[1, UNANSWERED]);
        assert_eq!(
            state.status(),
            &AttemptStatus::Submitted {
                submission_id: "sub-1".into(),
                score: 50
            }
        );
    }
}
