use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Every question offers exactly this many options, labelled A to D.
pub const OPTION_COUNT: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizCourse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    /// Presentation order. Never re-sorted.
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_option_index: u8,
}

impl QuizCourse {
    pub fn new(title: &str, description: &str, created_by: &str) -> Self {
        QuizCourse {
            id: Uuid::new_v4().to_string(),
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            created_by: created_by.to_string(),
            created_at: Utc::now(),
            questions: Vec::new(),
        }
    }

    pub fn is_takeable(&self) -> bool {
        !self.questions.is_empty()
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

impl Question {
    pub fn new(text: &str, options: Vec<String>, correct_option_index: u8) -> AppResult<Self> {
        let question = Question {
            id: Uuid::new_v4().to_string(),
            text: text.trim().to_string(),
            options: options.into_iter().map(|o| o.trim().to_string()).collect(),
            correct_option_index,
        };
        question.check_shape()?;
        Ok(question)
    }

    /// Option letter for a position, `A` through `D`.
    pub fn option_label(index: usize) -> Option<char> {
        (index < OPTION_COUNT).then(|| (b'A' + index as u8) as char)
    }

    pub fn is_correct(&self, answer: i32) -> bool {
        answer >= 0 && answer == i32::from(self.correct_option_index)
    }

    fn check_shape(&self) -> AppResult<()> {
        if self.text.is_empty() {
            return Err(AppError::ValidationError(
                "Please enter a question".to_string(),
            ));
        }
        if self.options.len() != OPTION_COUNT || self.options.iter().any(|o| o.is_empty()) {
            return Err(AppError::ValidationError(format!(
                "Please fill in all {} options",
                OPTION_COUNT
            )));
        }
        if usize::from(self.correct_option_index) >= OPTION_COUNT {
            return Err(AppError::ValidationError(format!(
                "Correct option index {} is out of range",
                self.correct_option_index
            )));
        }
        Ok(())
    }
}
