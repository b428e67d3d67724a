use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use colaraz_core::{AppError, AppResult, UserId};
use colaraz_domain::{AccessRoleAssignment, AssignmentScope, OrgScope, RoleName};

/// Failure categories of the access-role store.
#[derive(Debug, Error)]
pub enum AccessRoleStoreError {
    /// The row already exists; callers treat this as already satisfied.
    #[error("duplicate access role assignment '{0}'")]
    DuplicateAssignment(String),

    /// The store cannot be reached. Nothing staged in the unit of work is committed.
    #[error("access role store unavailable: {0}")]
    Unavailable(String),

    /// Any other store failure.
    #[error("access role store failure: {0}")]
    Internal(String),
}

impl From<AccessRoleStoreError> for AppError {
    fn from(value: AccessRoleStoreError) -> Self {
        match value {
            AccessRoleStoreError::DuplicateAssignment(key) => {
                AppError::Conflict(format!("access role assignment '{key}' already exists"))
            }
            AccessRoleStoreError::Unavailable(message) => AppError::Unavailable(message),
            AccessRoleStoreError::Internal(message) => AppError::Internal(message),
        }
    }
}

/// Result type of access-role store primitives.
pub type StoreResult<T> = Result<T, AccessRoleStoreError>;

/// Serialized unit of work over the rows of one (user, role) pair.
///
/// Implementations hold the per-key critical section from creation until
/// `commit` or drop. Dropping without committing discards staged writes.
#[async_trait]
pub trait AccessRoleUnitOfWork: Send {
    /// Returns the latest committed scopes held for the pair.
    async fn find(&mut self) -> StoreResult<BTreeSet<AssignmentScope>>;

    /// Removes exactly one row. Returns `false` when it was already absent.
    async fn delete(&mut self, scope: &AssignmentScope) -> StoreResult<bool>;

    /// Inserts a row, failing with `DuplicateAssignment` when it exists.
    async fn create_if_absent(&mut self, scope: &AssignmentScope) -> StoreResult<()>;

    /// Makes staged writes durable and releases the critical section.
    async fn commit(self: Box<Self>) -> StoreResult<()>;
}

/// Stored assignment projection for administrative views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRoleRecord {
    /// The stored assignment.
    pub assignment: AccessRoleAssignment,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

/// Filter for administrative assignment queries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessRoleQuery {
    /// Restrict to one user.
    pub user_id: Option<UserId>,
    /// Restrict to these roles; empty means any role.
    pub roles: Vec<RoleName>,
    /// Roles never returned.
    pub excluded_roles: Vec<RoleName>,
    /// Restrict to these orgs; `None` means any org.
    pub orgs: Option<Vec<OrgScope>>,
    /// Only rows with a non-empty org and no course restriction.
    pub org_wide_only: bool,
}

impl AccessRoleQuery {
    /// Returns whether an assignment satisfies the filter.
    #[must_use]
    pub fn matches(&self, assignment: &AccessRoleAssignment) -> bool {
        if self
            .user_id
            .is_some_and(|user_id| user_id != assignment.user_id())
        {
            return false;
        }

        if !self.roles.is_empty() && !self.roles.contains(assignment.role()) {
            return false;
        }

        if self.excluded_roles.contains(assignment.role()) {
            return false;
        }

        if let Some(orgs) = &self.orgs
            && !orgs.contains(assignment.org())
        {
            return false;
        }

        !self.org_wide_only || assignment.is_org_wide()
    }
}

/// Repository port for course access roles.
#[async_trait]
pub trait AccessRoleRepository: Send + Sync {
    /// Opens the serialized unit of work for one (user, role) pair.
    async fn begin_reconciliation(
        &self,
        user_id: UserId,
        role: &RoleName,
    ) -> StoreResult<Box<dyn AccessRoleUnitOfWork>>;

    /// Lists assignments matching a query, ordered by user, role, org and course.
    async fn list_assignments(&self, query: &AccessRoleQuery) -> AppResult<Vec<AccessRoleRecord>>;

    /// Stores an assignment. Returns `false` when it was already held.
    async fn grant(&self, assignment: &AccessRoleAssignment) -> AppResult<bool>;

    /// Removes an assignment. Returns `false` when it was not held.
    async fn revoke(&self, assignment: &AccessRoleAssignment) -> AppResult<bool>;
}
