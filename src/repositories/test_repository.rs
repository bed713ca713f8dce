use async_trait::async_trait;
use mongodb::{bson::doc, Collection};

use crate::{
    db::{is_duplicate_key, Database},
    errors::{AppError, AppResult},
    models::domain::Test,
    repositories::index,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TestRepository: Send + Sync {
    async fn create(&self, test: Test) -> AppResult<Test>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Test>>;
}

pub struct MongoTestRepository {
    collection: Collection<Test>,
}

impl MongoTestRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("tests");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.collection
            .create_index(index(doc! { "id": 1 }, "id_unique", true))
            .await?;
        self.collection
            .create_index(index(doc! { "course_id": 1 }, "course_id", false))
            .await?;

        log::info!("Created indexes for tests collection");
        Ok(())
    }
}

#[async_trait]
impl TestRepository for MongoTestRepository {
    async fn create(&self, test: Test) -> AppResult<Test> {
        match self.collection.insert_one(&test).await {
            Ok(_) => Ok(test),
            Err(e) if is_duplicate_key(&e) => Err(AppError::AlreadyExists(format!(
                "Test with id '{}' already exists",
                test.id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Test>> {
        let test = self.collection.find_one(doc! { "id": id }).await?;
        Ok(test)
    }
}
