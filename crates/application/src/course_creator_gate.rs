use std::sync::Arc;

use tracing::info;

use colaraz_core::{AppResult, UserId};
use colaraz_domain::{CourseCreatorState, CourseCreatorStatus};

use crate::course_creator_ports::CourseCreatorRepository;

/// Keeps the per-user course-creator record in sync.
#[derive(Clone)]
pub struct CourseCreatorGate {
    repository: Arc<dyn CourseCreatorRepository>,
}

impl CourseCreatorGate {
    /// Creates a gate over the provided store.
    #[must_use]
    pub fn new(repository: Arc<dyn CourseCreatorRepository>) -> Self {
        Self { repository }
    }

    /// Unconditionally upserts the record's state and approver.
    pub async fn set_course_creator_flag(
        &self,
        user_id: UserId,
        is_creator: bool,
        approving_actor: UserId,
    ) -> AppResult<CourseCreatorStatus> {
        let status = CourseCreatorStatus {
            user_id,
            state: CourseCreatorState::from_flag(is_creator),
            approved_by: approving_actor,
        };

        let previous = self.repository.upsert_status(status).await?;
        if status.state.is_granted() && previous != Some(CourseCreatorState::Granted) {
            info!(%user_id, approved_by = %approving_actor, "course creator access granted");
        }

        Ok(status)
    }

    /// Sets an existing record to denied. Users without a record are left alone.
    pub async fn revoke_course_creator_access(
        &self,
        user_id: UserId,
        actor: UserId,
    ) -> AppResult<bool> {
        let revoked = self
            .repository
            .update_existing_status(CourseCreatorStatus {
                user_id,
                state: CourseCreatorState::Denied,
                approved_by: actor,
            })
            .await?;

        if revoked {
            info!(%user_id, revoked_by = %actor, "course creator access revoked");
        }

        Ok(revoked)
    }

    /// Returns the user's state, treating a missing record as denied.
    pub async fn course_creator_status(&self, user_id: UserId) -> AppResult<CourseCreatorState> {
        Ok(self
            .repository
            .find_status(user_id)
            .await?
            .map(|status| status.state)
            .unwrap_or_default())
    }
}
