use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::ReplaceOptions, Collection};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::User,
    repositories::index,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts or refreshes a mirrored identity, keeping its original
    /// `created_at`.
    async fn upsert(&self, user: User) -> AppResult<User>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;
    async fn find_by_ids(&self, ids: Vec<String>) -> AppResult<Vec<User>>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("users");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.collection
            .create_index(index(doc! { "id": 1 }, "id_unique", true))
            .await?;

        log::info!("Created indexes for users collection");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn upsert(&self, mut user: User) -> AppResult<User> {
        if let Some(existing) = self.find_by_id(&user.id).await? {
            user.created_at = existing.created_at.or(user.created_at);
        }

        let options = ReplaceOptions::builder().upsert(true).build();
        self.collection
            .replace_one(doc! { "id": &user.id }, &user)
            .with_options(options)
            .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "id": id }).await?;
        Ok(user)
    }

    async fn find_by_ids(&self, ids: Vec<String>) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = self
            .collection
            .find(doc! { "id": { "$in": ids } })
            .await?
            .try_collect()
            .await?;
        Ok(users)
    }
}
