use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{duplicate_key_message, Database},
    errors::{AppError, AppResult},
    models::domain::{QuizSubmission, SentResult},
};

/// Graded attempts and the records of their scores being sent to students.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizSubmissionRepository: Send + Sync {
    async fn find_submission(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> AppResult<Option<QuizSubmission>>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizSubmission>>;
    /// Fails with `AlreadySubmitted` when the student already has a
    /// submission for the course.
    async fn insert_submission(&self, submission: QuizSubmission) -> AppResult<QuizSubmission>;
    async fn list_submissions_for_course(&self, course_id: &str) -> AppResult<Vec<QuizSubmission>>;
    async fn record_sent_result(&self, sent: SentResult) -> AppResult<SentResult>;
    async fn list_sent_results_for_student(&self, student_id: &str) -> AppResult<Vec<SentResult>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuizSubmissionRepository {
    submissions: Collection<QuizSubmission>,
    sent_results: Collection<SentResult>,
}

impl MongoQuizSubmissionRepository {
    pub fn new(db: &Database, submissions_collection: &str, sent_results_collection: &str) -> Self {
        Self {
            submissions: db.get_collection(submissions_collection),
            sent_results: db.get_collection(sent_results_collection),
        }
    }
}

#[async_trait]
impl QuizSubmissionRepository for MongoQuizSubmissionRepository {
    async fn find_submission(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> AppResult<Option<QuizSubmission>> {
        let submission = self
            .submissions
            .find_one(doc! {
                "student_id": student_id,
                "course_id": course_id
            })
            .await?;
        Ok(submission)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizSubmission>> {
        let submission = self.submissions.find_one(doc! { "id": id }).await?;
        Ok(submission)
    }

    async fn insert_submission(&self, submission: QuizSubmission) -> AppResult<QuizSubmission> {
        match self.submissions.insert_one(&submission).await {
            Ok(_) => Ok(submission),
            Err(err) if duplicate_key_message(&err).is_some() => {
                log::warn!(
                    "Rejected duplicate submission for student '{}' on course '{}'",
                    submission.student_id,
                    submission.course_id
                );
                Err(AppError::AlreadySubmitted)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn list_submissions_for_course(&self, course_id: &str) -> AppResult<Vec<QuizSubmission>> {
        let submissions = self
            .submissions
            .find(doc! { "course_id": course_id })
            .sort(doc! { "submitted_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(submissions)
    }

    async fn record_sent_result(&self, sent: SentResult) -> AppResult<SentResult> {
        self.sent_results.insert_one(&sent).await?;
        Ok(sent)
    }

    async fn list_sent_results_for_student(&self, student_id: &str) -> AppResult<Vec<SentResult>> {
        let results = self
            .sent_results
            .find(doc! { "student_id": student_id })
            .sort(doc! { "sent_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(results)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_submissions and sent_results collections");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let student_course_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "course_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("student_course_unique".to_string())
                    .build(),
            )
            .build();

        let course_index = IndexModel::builder()
            .keys(doc! { "course_id": 1 })
            .options(IndexOptions::builder().name("course_id".to_string()).build())
            .build();

        self.submissions.create_index(id_index).await?;
        self.submissions.create_index(student_course_index).await?;
        self.submissions.create_index(course_index).await?;

        let sent_student_index = IndexModel::builder()
            .keys(doc! { "student_id": 1 })
            .options(IndexOptions::builder().name("student_id".to_string()).build())
            .build();
        self.sent_results.create_index(sent_student_index).await?;

        log::info!("Successfully created indexes for quiz_submissions and sent_results");
        Ok(())
    }
}
