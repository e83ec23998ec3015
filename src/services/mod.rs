pub mod approval_service;
pub mod auth_service;
pub mod quiz_attempt_service;
pub mod quiz_course_service;
pub mod review_service;

pub use approval_service::ApprovalService;
pub use auth_service::AuthService;
pub use quiz_attempt_service::QuizAttemptService;
pub use quiz_course_service::QuizCourseService;
pub use review_service::ReviewService;
