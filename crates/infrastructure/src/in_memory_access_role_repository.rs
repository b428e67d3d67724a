use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use colaraz_application::{
    AccessRoleQuery, AccessRoleRecord, AccessRoleRepository, AccessRoleStoreError,
    AccessRoleUnitOfWork, StoreResult,
};
use colaraz_core::{AppResult, UserId};
use colaraz_domain::{AccessRoleAssignment, AssignmentScope, RoleName};


type Rows = Arc<RwLock<BTreeMap<AccessRoleAssignment, DateTime<Utc>>>>;

/// In-memory access-role repository with per-key serialization.
#[derive(Debug, Default)]
pub struct InMemoryAccessRoleRepository {
    rows: Rows,
    key_locks: Mutex<HashMap<(UserId, RoleName), Arc<Mutex<()>>>>,
}

impl InMemoryAccessRoleRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn lock_key(&self, user_id: UserId, role: &RoleName) -> OwnedMutexGuard<()> {
        let key_lock = self
            .key_locks
            .lock()
            .await
            .entry((user_id, role.clone()))
            .or_default()
            .clone();

        key_lock.lock_owned().await
    }
}

#[derive(Debug)]
enum StagedWrite {
    Delete(AssignmentScope),
    Create(AssignmentScope),
}

struct InMemoryUnitOfWork {
    rows: Rows,
    user_id: UserId,
    role: RoleName,
    view: BTreeSet<AssignmentScope>,
    staged: Vec<StagedWrite>,
    _guard: OwnedMutexGuard<()>,
}

impl InMemoryUnitOfWork {
    fn assignment(&self, scope: &AssignmentScope) -> AccessRoleAssignment {
        AccessRoleAssignment::new(
            self.user_id,
            self.role.clone(),
            scope.org.clone(),
            scope.course_scope.clone(),
        )
    }
}

#[async_trait]
impl AccessRoleUnitOfWork for InMemoryUnitOfWork {
    async fn find(&mut self) -> StoreResult<BTreeSet<AssignmentScope>> {
        Ok(self.view.clone())
    }

    async fn delete(&mut self, scope: &AssignmentScope) -> StoreResult<bool> {
        if !self.view.remove(scope) {
            return Ok(false);
        }

        self.staged.push(StagedWrite::Delete(scope.clone()));
        Ok(true)
    }

    async fn create_if_absent(&mut self, scope: &AssignmentScope) -> StoreResult<()> {
        if !self.view.insert(scope.clone()) {
            return Err(AccessRoleStoreError::DuplicateAssignment(
                self.assignment(scope).to_string(),
            ));
        }

        self.staged.push(StagedWrite::Create(scope.clone()));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let now = Utc::now();
        let mut rows = self.rows.write().await;
        for write in &self.staged {
            match write {
                StagedWrite::Delete(scope) => {
                    rows.remove(&self.assignment(scope));
                }
                StagedWrite::Create(scope) => {
                    rows.entry(self.assignment(scope)).or_insert(now);
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl AccessRoleRepository for InMemoryAccessRoleRepository {
    async fn begin_reconciliation(
        &self,
        user_id: UserId,
        role: &RoleName,
    ) -> StoreResult<Box<dyn AccessRoleUnitOfWork>> {
        let guard = self.lock_key(user_id, role).await;
        let view = self
            .rows
            .read()
            .await
            .keys()
            .filter(|row| row.user_id() == user_id && row.role() == role)
            .map(|row| row.scope().clone())
            .collect();

        Ok(Box::new(InMemoryUnitOfWork {
            rows: self.rows.clone(),
            user_id,
            role: role.clone(),
            view,
            staged: Vec::new(),
            _guard: guard,
        }))
    }

    async fn list_assignments(&self, query: &AccessRoleQuery) -> AppResult<Vec<AccessRoleRecord>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|(assignment, _)| query.matches(assignment))
            .map(|(assignment, created_at)| AccessRoleRecord {
                assignment: assignment.clone(),
                created_at: *created_at,
            })
            .collect())
    }

    async fn grant(&self, assignment: &AccessRoleAssignment) -> AppResult<bool> {
        let _guard = self.lock_key(assignment.user_id(), assignment.role()).await;
        let mut rows = self.rows.write().await;
        if rows.contains_key(assignment) {
            return Ok(false);
        }

        rows.insert(assignment.clone(), Utc::now());
        Ok(true)
    }

    async fn revoke(&self, assignment: &AccessRoleAssignment) -> AppResult<bool> {
        let _guard = self.lock_key(assignment.user_id(), assignment.role()).await;
        Ok(self.rows.write().await.remove(assignment).is_some())
    }
}
