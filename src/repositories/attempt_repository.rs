use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{
    db::{is_duplicate_key, Database},
    errors::{AppError, AppResult},
    models::domain::Attempt,
    repositories::index,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Stores the attempt and its reflections in one write.
    async fn create(&self, attempt: Attempt) -> AppResult<Attempt>;
    async fn has_user_attempted_test(&self, user_id: &str, test_id: &str) -> AppResult<bool>;
    /// Newest first.
    async fn get_user_attempts(
        &self,
        user_id: &str,
        test_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Attempt>, i64)>;
}

pub struct MongoAttemptRepository {
    collection: Collection<Attempt>,
}

impl MongoAttemptRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("attempts");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for attempts collection");

        self.collection
            .create_index(index(doc! { "id": 1 }, "id_unique", true))
            .await?;
        self.collection
            .create_index(index(
                doc! { "user_id": 1, "test_id": 1, "completed_at": -1 },
                "user_test",
                false,
            ))
            .await?;

        log::info!("Successfully created indexes for attempts collection");
        Ok(())
    }
}

#[async_trait]
impl AttemptRepository for MongoAttemptRepository {
    async fn create(&self, attempt: Attempt) -> AppResult<Attempt> {
        match self.collection.insert_one(&attempt).await {
            Ok(_) => Ok(attempt),
            Err(e) if is_duplicate_key(&e) => Err(AppError::AlreadyExists(format!(
                "Attempt with id '{}' already exists",
                attempt.id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn has_user_attempted_test(&self, user_id: &str, test_id: &str) -> AppResult<bool> {
        let attempt = self
            .collection
            .find_one(doc! { "user_id": user_id, "test_id": test_id })
            .await?;
        Ok(attempt.is_some())
    }

    async fn get_user_attempts(
        &self,
        user_id: &str,
        test_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Attempt>, i64)> {
        let filter = doc! { "user_id": user_id, "test_id": test_id };

        let total = self.collection.count_documents(filter.clone()).await?;

        let attempts = self
            .collection
            .find(filter)
            .skip(offset.max(0) as u64)
            .limit(limit)
            .sort(doc! { "completed_at": -1 })
            .await?
            .try_collect()
            .await?;

        Ok((attempts, total as i64))
    }
}
