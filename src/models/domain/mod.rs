pub mod quiz_attempt;
pub mod quiz_course;
pub mod quiz_submission;
pub mod sent_result;
pub mod session;
pub mod user;
pub use quiz_attempt::{AttemptState, AttemptStatus};
pub use quiz_course::{Question, QuizCourse};
pub use quiz_submission::QuizSubmission;
pub use sent_result::SentResult;
pub use session::Session;
pub use user::{User, UserRole, UserStatus};
