//! Process-local stores with the same contracts as the MongoDB ones,
//! including the unique constraints. Used for embedding and tests.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Question, QuizCourse, QuizSubmission, SentResult, User, UserRole, UserStatus},
    repositories::{QuizCourseRepository, QuizSubmissionRepository, UserRepository},
};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users_by_id: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_creation(mut users: Vec<User>) -> Vec<User> {
    users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.username.cmp(&b.username)));
    users
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> AppResult<User> {
        let mut users = self.users_by_id.write().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(AppError::DuplicateUsername(user.username));
        }
        if users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(AppError::DuplicateEmail(user.email));
        }
        if users.contains_key(&user.id) {
            return Err(AppError::InternalError(format!(
                "User with id '{}' already exists",
                user.id
            )));
        }

        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let users = self.users_by_id.read().await;
        Ok(users.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users_by_id.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users_by_id.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_credential(&self, identifier: &str) -> AppResult<Option<User>> {
        if identifier.contains('@') {
            self.find_by_email(identifier).await
        } else {
            self.find_by_username(identifier).await
        }
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let users = self.users_by_id.read().await;
        Ok(sorted_by_creation(users.values().cloned().collect()))
    }

    async fn find_by_role_and_status(
        &self,
        role: UserRole,
        status: UserStatus,
    ) -> AppResult<Vec<User>> {
        let users = self.users_by_id.read().await;
        Ok(sorted_by_creation(
            users
                .values()
                .filter(|u| u.role == role && u.status == status)
                .cloned()
                .collect(),
        ))
    }

    async fn update_status(&self, id: &str, status: UserStatus) -> AppResult<()> {
        let mut users = self.users_by_id.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))?;
        user.status = status;
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut users = self.users_by_id.write().await;
        if users.remove(id).is_none() {
            return Err(AppError::NotFound(format!("User with id '{}' not found", id)));
        }
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryQuizCourseRepository {
    courses: Arc<RwLock<HashMap<String, QuizCourse>>>,
}

impl InMemoryQuizCourseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizCourseRepository for InMemoryQuizCourseRepository {
    async fn list_courses(&self) -> AppResult<Vec<QuizCourse>> {
        let courses = self.courses.read().await;
        let mut items: Vec<_> = courses.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn get_course(&self, id: &str) -> AppResult<Option<QuizCourse>> {
        let courses = self.courses.read().await;
        Ok(courses.get(id).cloned())
    }

    async fn create_course(&self, course: QuizCourse) -> AppResult<QuizCourse> {
        let mut courses = self.courses.write().await;
        if courses.contains_key(&course.id) {
            return Err(AppError::InternalError(format!(
                "Quiz course with id '{}' already exists",
                course.id
            )));
        }
        courses.insert(course.id.clone(), course.clone());
        Ok(course)
    }

    async fn delete_course(&self, id: &str) -> AppResult<()> {
        let mut courses = self.courses.write().await;
        if courses.remove(id).is_none() {
            return Err(AppError::NotFound(format!("Quiz course with id '{}' not found", id)));
        }
        Ok(())
    }

    async fn add_question(&self, course_id: &str, question: Question) -> AppResult<Question> {
        let mut courses = self.courses.write().await;
        let course = courses.get_mut(course_id).ok_or_else(|| {
            AppError::NotFound(format!("Quiz course with id '{}' not found", course_id))
        })?;
        course.questions.push(question.clone());
        Ok(question)
    }

    async fn remove_question(&self, course_id: &str, question_id: &str) -> AppResult<()> {
        let mut courses = self.courses.write().await;
        let course = courses
            .get_mut(course_id)
            .filter(|c| c.questions.iter().any(|q| q.id == question_id))
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Question '{}' not found in quiz course '{}'",
                    question_id, course_id
                ))
            })?;
        course.questions.retain(|q| q.id != question_id);
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryQuizSubmissionRepository {
    submissions: Arc<RwLock<HashMap<String, QuizSubmission>>>,
    sent_results: Arc<RwLock<Vec<SentResult>>>,
}

impl InMemoryQuizSubmissionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizSubmissionRepository for InMemoryQuizSubmissionRepository {
    async fn find_submission(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> AppResult<Option<QuizSubmission>> {
        let submissions = self.submissions.read().await;
        Ok(submissions
            .values()
            .find(|s| s.student_id == student_id && s.course_id == course_id)
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizSubmission>> {
        let submissions = self.submissions.read().await;
        Ok(submissions.get(id).cloned())
    }

    async fn insert_submission(&self, submission: QuizSubmission) -> AppResult<QuizSubmission> {
        let mut submissions = self.submissions.write().await;
        let duplicate = submissions.values().any(|s| {
            s.student_id == submission.student_id && s.course_id == submission.course_id
        });
        if duplicate {
            return Err(AppError::AlreadySubmitted);
        }
        submissions.insert(submission.id.clone(), submission.clone());
        Ok(submission)
    }

    async fn list_submissions_for_course(&self, course_id: &str) -> AppResult<Vec<QuizSubmission>> {
        let submissions = self.submissions.read().await;
        let mut items: Vec<_> = submissions
            .values()
            .filter(|s| s.course_id == course_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(items)
    }

    async fn record_sent_result(&self, sent: SentResult) -> AppResult<SentResult> {
        self.sent_results.write().await.push(sent.clone());
        Ok(sent)
    }

    async fn list_sent_results_for_student(&self, student_id: &str) -> AppResult<Vec<SentResult>> {
        let sent_results = self.sent_results.read().await;
        let mut items: Vec<_> = sent_results
            .iter()
            .filter(|r| r.student_id == student_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        Ok(items)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::quiz_course::fixtures::question;

    #[tokio::test]
    async fn test_user_insert_enforces_unique_username_and_email() {
        let repo = InMemoryUserRepository::new();
        let user = User::test_student("ann", UserStatus::Pending);
        repo.insert(user.clone()).await.expect("first insert succeeds");

        let same_username = User {
            email: "other@example.com".into(),
            ..User::test_student("ann", UserStatus::Pending)
        };
        assert_eq!(
            repo.insert(same_username).await,
            Err(AppError::DuplicateUsername("ann".into()))
        );

        let same_email = User {
            username: "ann2".into(),
            email: "ANN@example.com".into(),
            ..User::test_student("x", UserStatus::Pending)
        };
        assert!(matches!(
            repo.insert(same_email).await,
            Err(AppError::DuplicateEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_find_by_credential_matches_email_or_username() {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .insert(User::test_student("bea", UserStatus::Approved))
            .await
            .unwrap();

        let by_email = repo.find_by_credential("bea@example.com").await.unwrap();
        let by_username = repo.find_by_credential("bea").await.unwrap();

        assert_eq!(by_email.map(|u| u.id), Some(user.id.clone()));
        assert_eq!(by_username.map(|u| u.id), Some(user.id));
        assert!(repo.find_by_credential("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_credential_prefers_email_for_addresses() {
        let repo = InMemoryUserRepository::new();
        let owner = repo
            .insert(User::test_student("ann", UserStatus::Approved))
            .await
            .unwrap();
        repo.insert(User {
            username: "ann@example.com".into(),
            email: "other@example.com".into(),
            ..User::test_student("x", UserStatus::Approved)
        })
        .await
        .unwrap();

        for _ in 0..20 {
            let found = repo.find_by_credential("ann@example.com").await.unwrap();
            assert_eq!(found.map(|u| u.id), Some(owner.id.clone()));
        }
    }

    #[tokio::test]
    async fn test_update_status_and_delete_report_missing_users() {
        let repo = InMemoryUserRepository::new();
        assert!(matches!(
            repo.update_status("missing", UserStatus::Approved).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(repo.delete("missing").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_questions_keep_insertion_order() {
        let repo = InMemoryQuizCourseRepository::new();
        let course = repo
            .create_course(QuizCourse::new("T", "D", "admin"))
            .await
            .unwrap();

        let first = repo.add_question(&course.id, question("first", 0)).await.unwrap();
        let second = repo.add_question(&course.id, question("second", 1)).await.unwrap();
        let third = repo.add_question(&course.id, question("third", 2)).await.unwrap();
        repo.remove_question(&course.id, &second.id).await.unwrap();

        let stored = repo.get_course(&course.id).await.unwrap().unwrap();
        let ids: Vec<_> = stored.questions.iter().map(|q| q.id.clone()).collect();
        assert_eq!(ids, vec![first.id, third.id]);

        assert!(matches!(
            repo.remove_question(&course.id, &second.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_submission_uniqueness_per_student_and_course() {
        let repo = InMemoryQuizSubmissionRepository::new();
        repo.insert_submission(QuizSubmission::new("s", "c", vec![0], 100))
            .await
            .unwrap();

        let again = repo
            .insert_submission(QuizSubmission::new("s", "c", vec![1], 0))
            .await;
        assert_eq!(again, Err(AppError::AlreadySubmitted));

        repo.insert_submission(QuizSubmission::new("s", "other", vec![1], 0))
            .await
            .expect("different course is a separate attempt");
        assert_eq!(repo.list_submissions_for_course("c").await.unwrap().len(), 1);
    }
}
