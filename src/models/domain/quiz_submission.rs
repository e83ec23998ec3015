use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::quiz_course::Question;

/// Stored in `answers` for a question the student never answered.
pub const UNANSWERED: i32 = -1;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizSubmission {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    /// One entry per question, in course order.
    pub answers: Vec<i32>,
    pub submitted_at: DateTime<Utc>,
    pub score: u8,
}

impl QuizSubmission {
    pub fn new(student_id: &str, course_id: &str, answers: Vec<i32>, score: u8) -> Self {
        QuizSubmission {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            course_id: course_id.to_string(),
            answers,
            submitted_at: Utc::now(),
            score,
        }
    }

    pub fn unanswered_count(&self) -> usize {
        self.answers.iter().filter(|a| **a == UNANSWERED).count()
    }
}

/// Percentage of `questions` answered correctly, rounded half up.
///
/// Missing or unanswered entries count as incorrect. Returns 0 for an
/// empty question list.
pub fn score_answers(answers: &[i32], questions: &[Question]) -> u8 {
    let total = questions.len();
    if total == 0 {
        return 0;
    }

    let correct = questions
        .iter()
        .enumerate()
        .filter(|(i, q)| answers.get(*i).is_some_and(|a| q.is_correct(*a)))
        .count();

    ((200 * correct + total) / (2 * total)) as u8
}
