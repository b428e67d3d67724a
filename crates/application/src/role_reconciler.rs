use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use colaraz_core::{AppResult, UserId};
use colaraz_domain::{AssignmentScope, OrgScope, ReconciliationPlan, RoleName};

use crate::access_role_ports::{AccessRoleRepository, AccessRoleStoreError};

#[cfg(test)]
mod tests;

/// Write counts of one reconciliation, for observability only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileResult {
    /// Rows removed.
    pub deleted: usize,
    /// Rows inserted.
    pub created: usize,
    /// Rows held for the (user, role) pair after the call.
    pub remaining: usize,
}

impl ReconcileResult {
    /// Returns whether the call performed any write.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.deleted == 0 && self.created == 0
    }
}

/// Brings the rows of one (user, role) pair in line with a desired org set.
#[derive(Clone)]
pub struct RoleReconciler {
    repository: Arc<dyn AccessRoleRepository>,
}

impl RoleReconciler {
    /// Creates a reconciler over the provided store.
    #[must_use]
    pub fn new(repository: Arc<dyn AccessRoleRepository>) -> Self {
        Self { repository }
    }

    /// Deletes stale rows, then inserts missing ones, inside one unit of work.
    ///
    /// Repeating a call with the same desired orgs performs no writes.
    pub async fn reconcile<I>(
        &self,
        user_id: UserId,
        role: &RoleName,
        desired_orgs: I,
    ) -> AppResult<ReconcileResult>
    where
        I: IntoIterator<Item = OrgScope> + Send,
    {
        let desired: BTreeSet<OrgScope> = desired_orgs.into_iter().collect();

        let mut unit_of_work = self
            .repository
            .begin_reconciliation(user_id, role)
            .await?;
        let existing = unit_of_work.find().await?;
        let plan = ReconciliationPlan::compute(&existing, &desired);

        let mut result = ReconcileResult::default();
        let mut already_present = 0_usize;
        for scope in &plan.to_delete {
            if unit_of_work.delete(scope).await? {
                result.deleted += 1;
            }
        }

        for org in &plan.to_create {
            match unit_of_work
                .create_if_absent(&AssignmentScope::org_wide(org.clone()))
                .await
            {
                Ok(()) => result.created += 1,
                Err(AccessRoleStoreError::DuplicateAssignment(key)) => {
                    already_present += 1;
                    debug!(%user_id, %role, %key, "access role already present");
                }
                Err(error) => return Err(error.into()),
            }
        }

        unit_of_work.commit().await?;

        result.remaining =
            existing.len() - plan.to_delete.len() + result.created + already_present;
        if !result.is_noop() {
            info!(
                %user_id,
                %role,
                deleted = result.deleted,
                created = result.created,
                "reconciled access roles"
            );
        }

        Ok(result)
    }
}
