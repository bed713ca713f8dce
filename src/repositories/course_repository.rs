use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{
    db::{is_duplicate_key, Database},
    errors::{AppError, AppResult},
    models::domain::Course,
    repositories::index,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create(&self, course: Course) -> AppResult<Course>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Course>>;
    async fn find_by_ids(&self, ids: Vec<String>) -> AppResult<Vec<Course>>;
    /// The course whose module tree contains the lesson.
    async fn find_by_lesson_id(&self, lesson_id: &str) -> AppResult<Option<Course>>;
    async fn list_published(&self, offset: i64, limit: i64) -> AppResult<(Vec<Course>, i64)>;
    async fn update(&self, course: Course) -> AppResult<Course>;
}

pub struct MongoCourseRepository {
    collection: Collection<Course>,
}

impl MongoCourseRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("courses");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for courses collection");

        self.collection
            .create_index(index(doc! { "id": 1 }, "id_unique", true))
            .await?;
        self.collection
            .create_index(index(doc! { "modules.lessons.id": 1 }, "lesson_id", false))
            .await?;
        self.collection
            .create_index(index(doc! { "published": 1 }, "published", false))
            .await?;

        log::info!("Successfully created indexes for courses collection");
        Ok(())
    }
}

#[async_trait]
impl CourseRepository for MongoCourseRepository {
    async fn create(&self, course: Course) -> AppResult<Course> {
        match self.collection.insert_one(&course).await {
            Ok(_) => Ok(course),
            Err(e) if is_duplicate_key(&e) => Err(AppError::AlreadyExists(format!(
                "Course with id '{}' already exists",
                course.id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Course>> {
        let course = self.collection.find_one(doc! { "id": id }).await?;
        Ok(course)
    }

    async fn find_by_ids(&self, ids: Vec<String>) -> AppResult<Vec<Course>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let courses = self
            .collection
            .find(doc! { "id": { "$in": ids } })
            .await?
            .try_collect()
            .await?;
        Ok(courses)
    }

    async fn find_by_lesson_id(&self, lesson_id: &str) -> AppResult<Option<Course>> {
        let course = self
            .collection
            .find_one(doc! { "modules.lessons.id": lesson_id })
            .await?;
        Ok(course)
    }

    async fn list_published(&self, offset: i64, limit: i64) -> AppResult<(Vec<Course>, i64)> {
        let filter = doc! { "published": true };

        let total = self.collection.count_documents(filter.clone()).await? as i64;

        let courses = self
            .collection
            .find(filter)
            .skip(offset.max(0) as u64)
            .limit(limit)
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;

        Ok((courses, total))
    }

    async fn update(&self, course: Course) -> AppResult<Course> {
        let result = self
            .collection
            .replace_one(doc! { "id": &course.id }, &course)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Course with id '{}' not found",
                course.id
            )));
        }

        Ok(course)
    }
}
