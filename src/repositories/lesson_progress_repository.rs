use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{
    db::{is_duplicate_key, Database},
    errors::{AppError, AppResult},
    models::domain::LessonProgress,
    repositories::index,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LessonProgressRepository: Send + Sync {
    async fn find(&self, user_id: &str, lesson_id: &str) -> AppResult<Option<LessonProgress>>;
    /// Fails with `AlreadyExists` when the (user, lesson) row exists.
    async fn create(&self, progress: LessonProgress) -> AppResult<LessonProgress>;
    async fn update(&self, progress: LessonProgress) -> AppResult<LessonProgress>;
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<LessonProgress>>;
    async fn list_by_user_and_course(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> AppResult<Vec<LessonProgress>>;
    /// Rows in first-visited order.
    async fn list_by_course(&self, course_id: &str) -> AppResult<Vec<LessonProgress>>;
}

pub struct MongoLessonProgressRepository {
    collection: Collection<LessonProgress>,
}

impl MongoLessonProgressRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("lesson_progress");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for lesson_progress collection");

        self.collection
            .create_index(index(doc! { "id": 1 }, "id_unique", true))
            .await?;
        self.collection
            .create_index(index(
                doc! { "user_id": 1, "lesson_id": 1 },
                "user_lesson_unique",
                true,
            ))
            .await?;
        self.collection
            .create_index(index(doc! { "course_id": 1, "user_id": 1 }, "course_user", false))
            .await?;

        log::info!("Successfully created indexes for lesson_progress collection");
        Ok(())
    }
}

#[async_trait]
impl LessonProgressRepository for MongoLessonProgressRepository {
    async fn find(&self, user_id: &str, lesson_id: &str) -> AppResult<Option<LessonProgress>> {
        let progress = self
            .collection
            .find_one(doc! { "user_id": user_id, "lesson_id": lesson_id })
            .await?;
        Ok(progress)
    }

    async fn create(&self, progress: LessonProgress) -> AppResult<LessonProgress> {
        match self.collection.insert_one(&progress).await {
            Ok(_) => Ok(progress),
            Err(e) if is_duplicate_key(&e) => Err(AppError::AlreadyExists(format!(
                "Progress for lesson '{}' already recorded",
                progress.lesson_id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, progress: LessonProgress) -> AppResult<LessonProgress> {
        let result = self
            .collection
            .replace_one(doc! { "id": &progress.id }, &progress)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Lesson progress '{}' not found",
                progress.id
            )));
        }

        Ok(progress)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<LessonProgress>> {
        let rows = self
            .collection
            .find(doc! { "user_id": user_id })
            .await?
            .try_collect()
            .await?;
        Ok(rows)
    }

    async fn list_by_user_and_course(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> AppResult<Vec<LessonProgress>> {
        let rows = self
            .collection
            .find(doc! { "user_id": user_id, "course_id": course_id })
            .await?
            .try_collect()
            .await?;
        Ok(rows)
    }

    async fn list_by_course(&self, course_id: &str) -> AppResult<Vec<LessonProgress>> {
        let rows = self
            .collection
            .find(doc! { "course_id": course_id })
            .sort(doc! { "visited_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(rows)
    }
}
