use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{
    db::{is_duplicate_key, Database},
    errors::{AppError, AppResult},
    models::domain::Enrollment,
    repositories::index,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Creates the (user, course) enrollment or refreshes the notification
    /// preferences of the existing one. The flag is true when a new row
    /// was created.
    async fn upsert(&self, enrollment: Enrollment) -> AppResult<(Enrollment, bool)>;
    async fn find(&self, user_id: &str, course_id: &str) -> AppResult<Option<Enrollment>>;
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Enrollment>>;
    async fn list_by_course(&self, course_id: &str) -> AppResult<Vec<Enrollment>>;
}

pub struct MongoEnrollmentRepository {
    collection: Collection<Enrollment>,
}

impl MongoEnrollmentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("enrollments");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for enrollments collection");

        self.collection
            .create_index(index(doc! { "id": 1 }, "id_unique", true))
            .await?;
        self.collection
            .create_index(index(
                doc! { "user_id": 1, "course_id": 1 },
                "user_course_unique",
                true,
            ))
            .await?;
        self.collection
            .create_index(index(doc! { "course_id": 1 }, "course_id", false))
            .await?;

        log::info!("Successfully created indexes for enrollments collection");
        Ok(())
    }

    async fn refresh_preferences(
        &self,
        mut existing: Enrollment,
        requested: &Enrollment,
    ) -> AppResult<Enrollment> {
        existing.notifications = requested.notifications;
        self.collection
            .replace_one(doc! { "id": &existing.id }, &existing)
            .await?;
        Ok(existing)
    }
}

#[async_trait]
impl EnrollmentRepository for MongoEnrollmentRepository {
    async fn upsert(&self, enrollment: Enrollment) -> AppResult<(Enrollment, bool)> {
        if let Some(existing) = self.find(&enrollment.user_id, &enrollment.course_id).await? {
            let updated = self.refresh_preferences(existing, &enrollment).await?;
            return Ok((updated, false));
        }

        match self.collection.insert_one(&enrollment).await {
            Ok(_) => Ok((enrollment, true)),
            Err(e) if is_duplicate_key(&e) => {
                // A concurrent request inserted the pair first.
                let existing = self
                    .find(&enrollment.user_id, &enrollment.course_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::DatabaseError(
                            "Enrollment vanished after duplicate key error".to_string(),
                        )
                    })?;
                let updated = self.refresh_preferences(existing, &enrollment).await?;
                Ok((updated, false))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find(&self, user_id: &str, course_id: &str) -> AppResult<Option<Enrollment>> {
        let enrollment = self
            .collection
            .find_one(doc! { "user_id": user_id, "course_id": course_id })
            .await?;
        Ok(enrollment)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Enrollment>> {
        let enrollments = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "enrolled_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(enrollments)
    }

    async fn list_by_course(&self, course_id: &str) -> AppResult<Vec<Enrollment>> {
        let enrollments = self
            .collection
            .find(doc! { "course_id": course_id })
            .sort(doc! { "enrolled_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(enrollments)
    }
}
