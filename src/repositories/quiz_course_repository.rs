use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{Question, QuizCourse},
};

/// Courses with their questions embedded in presentation order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizCourseRepository: Send + Sync {
    async fn list_courses(&self) -> AppResult<Vec<QuizCourse>>;
    async fn get_course(&self, id: &str) -> AppResult<Option<QuizCourse>>;
    async fn create_course(&self, course: QuizCourse) -> AppResult<QuizCourse>;
    async fn delete_course(&self, id: &str) -> AppResult<()>;
    /// Appends to the end of the course's question list.
    async fn add_question(&self, course_id: &str, question: Question) -> AppResult<Question>;
    async fn remove_question(&self, course_id: &str, question_id: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuizCourseRepository {
    collection: Collection<QuizCourse>,
}

impl MongoQuizCourseRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }
}

#[async_trait]
impl QuizCourseRepository for MongoQuizCourseRepository {
    async fn list_courses(&self) -> AppResult<Vec<QuizCourse>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await?;
        let courses: Vec<QuizCourse> = cursor.try_collect().await?;
        Ok(courses)
    }

    async fn get_course(&self, id: &str) -> AppResult<Option<QuizCourse>> {
        let course = self.collection.find_one(doc! { "id": id }).await?;
        Ok(course)
    }

    async fn create_course(&self, course: QuizCourse) -> AppResult<QuizCourse> {
        self.collection.insert_one(&course).await?;
        Ok(course)
    }

    async fn delete_course(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Quiz course with id '{}' not found", id)));
        }

        Ok(())
    }

    async fn add_question(&self, course_id: &str, question: Question) -> AppResult<Question> {
        let result = self
            .collection
            .update_one(
                doc! { "id": course_id },
                doc! { "$push": { "questions": to_bson(&question)? } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Quiz course with id '{}' not found",
                course_id
            )));
        }

        Ok(question)
    }

    async fn remove_question(&self, course_id: &str, question_id: &str) -> AppResult<()> {
        let result = self
            .collection
            .update_one(
                doc! { "id": course_id, "questions.id": question_id },
                doc! { "$pull": { "questions": { "id": question_id } } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Question '{}' not found in quiz course '{}'",
                question_id, course_id
            )));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_courses collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;

        log::info!("Successfully created indexes for quiz_courses collection");
        Ok(())
    }
}
