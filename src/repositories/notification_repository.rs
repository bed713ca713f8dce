use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Collection,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Notification,
    repositories::index,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: Notification) -> AppResult<Notification>;
    /// Newest first.
    async fn list_by_user(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Notification>, i64)>;
    /// Flips `is_read`; the only mutation notifications allow.
    async fn mark_read(&self, id: &str, user_id: &str) -> AppResult<Notification>;
}

pub struct MongoNotificationRepository {
    collection: Collection<Notification>,
}

impl MongoNotificationRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("notifications");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.collection
            .create_index(index(doc! { "id": 1 }, "id_unique", true))
            .await?;
        self.collection
            .create_index(index(
                doc! { "user_id": 1, "created_at": -1 },
                "user_created",
                false,
            ))
            .await?;

        log::info!("Created indexes for notifications collection");
        Ok(())
    }
}

#[async_trait]
impl NotificationRepository for MongoNotificationRepository {
    async fn create(&self, notification: Notification) -> AppResult<Notification> {
        self.collection.insert_one(&notification).await?;
        Ok(notification)
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Notification>, i64)> {
        let filter = doc! { "user_id": user_id };

        let total = self.collection.count_documents(filter.clone()).await?;

        let notifications = self
            .collection
            .find(filter)
            .skip(offset.max(0) as u64)
            .limit(limit)
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;

        Ok((notifications, total as i64))
    }

    async fn mark_read(&self, id: &str, user_id: &str) -> AppResult<Notification> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection
            .find_one_and_update(
                doc! { "id": id, "user_id": user_id },
                doc! { "$set": { "is_read": true } },
            )
            .with_options(options)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Notification '{}' not found", id)))
    }
}
