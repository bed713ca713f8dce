use std::sync::Arc;

use crate::{
    auth::Claims,
    errors::AppResult,
    models::domain::Notification,
    repositories::NotificationRepository,
};

pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(
        &self,
        claims: &Claims,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Notification>, i64)> {
        self.repository.list_by_user(&claims.sub, offset, limit).await
    }

    /// Only the recipient can mark a notification read; other users get
    /// `NotFound`.
    pub async fn mark_read(&self, claims: &Claims, id: &str) -> AppResult<Notification> {
        self.repository.mark_read(id, &claims.sub).await
    }
}
