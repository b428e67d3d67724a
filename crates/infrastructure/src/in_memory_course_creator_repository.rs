use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use colaraz_application::CourseCreatorRepository;
use colaraz_core::{AppResult, UserId};
use colaraz_domain::{CourseCreatorState, CourseCreatorStatus};

/// In-memory course-creator repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryCourseCreatorRepository {
    statuses: RwLock<HashMap<UserId, CourseCreatorStatus>>,
}

impl InMemoryCourseCreatorRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseCreatorRepository for InMemoryCourseCreatorRepository {
    async fn find_status(&self, user_id: UserId) -> AppResult<Option<CourseCreatorStatus>> {
        Ok(self.statuses.read().await.get(&user_id).copied())
    }

    async fn upsert_status(
        &self,
        status: CourseCreatorStatus,
    ) -> AppResult<Option<CourseCreatorState>> {
        Ok(self
            .statuses
            .write()
            .await
            .insert(status.user_id, status)
            .map(|previous| previous.state))
    }

    async fn update_existing_status(&self, status: CourseCreatorStatus) -> AppResult<bool> {
        let mut statuses = self.statuses.write().await;
        let Some(existing) = statuses.get_mut(&status.user_id) else {
            return Ok(false);
        };

        *existing = status;
        Ok(true)
    }
}
