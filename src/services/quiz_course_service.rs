use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{require_admin, require_session, SessionManager},
    errors::{AppError, AppResult},
    models::{
        domain::{Question, QuizCourse},
        dto::request::{CreateCourseRequest, CreateQuestionRequest},
    },
    repositories::QuizCourseRepository,
};

/// Course catalog. Any authenticated user may read; only admins author.
pub struct QuizCourseService {
    courses: Arc<dyn QuizCourseRepository>,
    sessions: Arc<SessionManager>,
}

impl QuizCourseService {
    pub fn new(courses: Arc<dyn QuizCourseRepository>, sessions: Arc<SessionManager>) -> Self {
        Self { courses, sessions }
    }

    /// Newest first.
    pub async fn list_courses(&self) -> AppResult<Vec<QuizCourse>> {
        require_session(self.sessions.get())?;
        self.courses.list_courses().await
    }

    pub async fn get_course(&self, course_id: &str) -> AppResult<QuizCourse> {
        require_session(self.sessions.get())?;
        self.courses
            .get_course(course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Quiz course with id '{}' not found", course_id))
            })
    }

    pub async fn create_course(&self, request: CreateCourseRequest) -> AppResult<QuizCourse> {
        let admin = require_admin(self.sessions.get())?;
        let request = request.trimmed();
        request.validate()?;

        let course = QuizCourse::new(&request.title, &request.description, admin.user_id());
        let course = self.courses.create_course(course).await?;
        log::info!("Admin '{}' created quiz course '{}'", admin.user.username, course.title);
        Ok(course)
    }

    pub async fn delete_course(&self, course_id: &str) -> AppResult<()> {
        let admin = require_admin(self.sessions.get())?;
        self.courses.delete_course(course_id).await?;
        log::info!("Admin '{}' deleted quiz course {}", admin.user.username, course_id);
        Ok(())
    }

    /// Appends a question at the end of the course's presentation order.
    pub async fn add_question(
        &self,
        course_id: &str,
        request: CreateQuestionRequest,
    ) -> AppResult<Question> {
        require_admin(self.sessions.get())?;
        request.validate()?;

        let question = Question::new(&request.text, request.options, request.correct_option_index)?;
        let question = self.courses.add_question(course_id, question).await?;
        log::debug!("Added question {} to quiz course {}", question.id, course_id);
        Ok(question)
    }

    pub async fn remove_question(&self, course_id: &str, question_id: &str) -> AppResult<()> {
        require_admin(self.sessions.get())?;
        self.courses.remove_question(course_id, question_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            domain::{Session, User, UserStatus},
            dto::response::UserDto,
        },
        repositories::InMemoryQuizCourseRepository,
    };

    fn setup(admin: bool) -> QuizCourseService {
        let user = if admin {
            User::new_admin("Root", "root@example.com", "root", "hash".into())
        } else {
            User::test_student("ann", UserStatus::Approved)
        };
        let sessions = Arc::new(SessionManager::new());
        sessions.set(Session::new(UserDto::from(user), "token".into()));
        QuizCourseService::new(Arc::new(InMemoryQuizCourseRepository::new()), sessions)
    }

    fn question_request(text: &str, correct: u8) -> CreateQuestionRequest {
        CreateQuestionRequest {
            text: text.into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_option_index: correct,
        }
    }

    fn course_request(title: &str) -> CreateCourseRequest {
        CreateCourseRequest {
            title: title.into(),
            description: "About things".into(),
        }
    }

    #[tokio::test]
    async fn test_authoring_keeps_question_order() {
        let service = setup(true);
        let course = service.create_course(course_request("  Rust  ")).await.unwrap();
        assert_eq!(course.title, "Rust");
        assert!(!course.is_takeable());

        let first = service.add_question(&course.id, question_request("One", 0)).await.unwrap();
        let second = service.add_question(&course.id, question_request("Two", 3)).await.unwrap();
        service.add_question(&course.id, question_request("Three", 1)).await.unwrap();
        service.remove_question(&course.id, &second.id).await.unwrap();

        let stored = service.get_course(&course.id).await.unwrap();
        let texts: Vec<_> = stored.questions.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["One", "Three"]);
        assert_eq!(stored.questions[0].id, first.id);
    }

    #[tokio::test]
    async fn test_invalid_question_is_rejected() {
        let service = setup(true);
        let course = service.create_course(course_request("Rust")).await.unwrap();

        let mut three_options = question_request("Q", 0);
        three_options.options.pop();
        assert!(matches!(
            service.add_question(&course.id, three_options).await,
            Err(AppError::ValidationError(_))
        ));

        let mut blank_option = question_request("Q", 0);
        blank_option.options[1] = "  ".into();
        assert!(matches!(
            service.add_question(&course.id, blank_option).await,
            Err(AppError::ValidationError(_))
        ));

        assert!(matches!(
            service.add_question(&course.id, question_request("Q", 4)).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(service.get_course(&course.id).await.unwrap().questions.is_empty());
    }

    #[tokio::test]
    async fn test_missing_course_is_not_found() {
        let service = setup(true);

        assert!(matches!(service.get_course("nope").await, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete_course("nope").await, Err(AppError::NotFound(_))));
        assert!(matches!(
            service.add_question("nope", question_request("Q", 0)).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_students_can_read_but_not_author() {
        let service = setup(false);

        assert!(service.list_courses().await.unwrap().is_empty());
        assert!(matches!(
            service.create_course(course_request("Rust")).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_course() {
        let service = setup(true);
        let course = service.create_course(course_request("Rust")).await.unwrap();

        service.delete_course(&course.id).await.unwrap();
        assert!(service.list_courses().await.unwrap().is_empty());
    }
}
