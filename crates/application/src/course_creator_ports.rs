use async_trait::async_trait;

use colaraz_core::{AppResult, UserId};
use colaraz_domain::{CourseCreatorState, CourseCreatorStatus};

/// Repository port for the per-user course-creator record.
#[async_trait]
pub trait CourseCreatorRepository: Send + Sync {
    /// Returns the stored record, if any.
    async fn find_status(&self, user_id: UserId) -> AppResult<Option<CourseCreatorStatus>>;

    /// Creates or overwrites the record and returns the previous state.
    async fn upsert_status(
        &self,
        status: CourseCreatorStatus,
    ) -> AppResult<Option<CourseCreatorState>>;

    /// Overwrites an existing record. Returns `false` when none exists.
    async fn update_existing_status(&self, status: CourseCreatorStatus) -> AppResult<bool>;
}
