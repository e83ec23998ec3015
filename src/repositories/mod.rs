pub mod in_memory;
pub mod quiz_course_repository;
pub mod quiz_submission_repository;
pub mod user_repository;

pub use in_memory::{
    InMemoryQuizCourseRepository, InMemoryQuizSubmissionRepository, InMemoryUserRepository,
};
pub use quiz_course_repository::{MongoQuizCourseRepository, QuizCourseRepository};
pub use quiz_submission_repository::{MongoQuizSubmissionRepository, QuizSubmissionRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
