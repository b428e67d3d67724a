use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use colaraz_core::{AppError, AppResult, UserId};
use colaraz_domain::{
    AccessRoleAssignment, AssignmentScope, CourseCreatorState, CourseCreatorStatus, OrgScope,
    RoleName,
};

use crate::access_role_ports::{
    AccessRoleQuery, AccessRoleRecord, AccessRoleRepository, AccessRoleStoreError,
    AccessRoleUnitOfWork, StoreResult,
};
use crate::course_creator_ports::CourseCreatorRepository;

pub(crate) fn user(value: i64) -> UserId {
    match UserId::new(value) {
        Ok(user_id) => user_id,
        Err(error) => panic!("invalid user fixture: {error}"),
    }
}

pub(crate) fn role(value: &str) -> RoleName {
    match RoleName::new(value) {
        Ok(role) => role,
        Err(error) => panic!("invalid role fixture: {error}"),
    }
}

pub(crate) fn orgs(values: &[&str]) -> Vec<OrgScope> {
    values.iter().map(|value| OrgScope::new(*value)).collect()
}

#[derive(Default)]
struct StoreState {
    rows: BTreeSet<AccessRoleAssignment>,
    deletes: usize,
    inserts: usize,
    hidden_from_reads: BTreeSet<AccessRoleAssignment>,
    unavailable: bool,
}

/// Access-role repository double that counts writes.
#[derive(Clone, Default)]
pub(crate) struct FakeAccessRoleRepository {
    state: Arc<Mutex<StoreState>>,
}

impl FakeAccessRoleRepository {
    pub(crate) async fn seed(&self, user_id: UserId, role: &str, orgs: &[&str]) {
        let mut state = self.state.lock().await;
        for org in orgs {
            state.rows.insert(AccessRoleAssignment::new(
                user_id,
                self::role(role),
                OrgScope::new(*org),
                colaraz_domain::CourseScope::Empty,
            ));
        }
    }

    pub(crate) async fn seed_assignment(&self, assignment: AccessRoleAssignment) {
        self.state.lock().await.rows.insert(assignment);
    }

    /// Makes a row exist for writers while staying invisible to `find`.
    pub(crate) async fn insert_behind_reads(&self, assignment: AccessRoleAssignment) {
        let mut state = self.state.lock().await;
        state.rows.insert(assignment.clone());
        state.hidden_from_reads.insert(assignment);
    }

    pub(crate) async fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().await.unavailable = unavailable;
    }

    pub(crate) async fn orgs_for(&self, user_id: UserId, role: &str) -> Vec<String> {
        self.state
            .lock()
            .await
            .rows
            .iter()
            .filter(|row| row.user_id() == user_id && row.role().as_str() == role)
            .map(|row| row.org().as_str().to_owned())
            .collect()
    }

    pub(crate) async fn rows(&self) -> Vec<AccessRoleAssignment> {
        self.state.lock().await.rows.iter().cloned().collect()
    }

    pub(crate) async fn write_counts(&self) -> (usize, usize) {
        let state = self.state.lock().await;
        (state.deletes, state.inserts)
    }

    pub(crate) async fn reset_write_counts(&self) {
        let mut state = self.state.lock().await;
        state.deletes = 0;
        state.inserts = 0;
    }
}

struct FakeUnitOfWork {
    state: Arc<Mutex<StoreState>>,
    user_id: UserId,
    role: RoleName,
}

impl FakeUnitOfWork {
    fn assignment(&self, scope: &AssignmentScope) -> AccessRoleAssignment {
        AccessRoleAssignment::new(
            self.user_id,
            self.role.clone(),
            scope.org.clone(),
            scope.course_scope.clone(),
        )
    }
}

fn ensure_available(state: &StoreState) -> StoreResult<()> {
    if state.unavailable {
        return Err(AccessRoleStoreError::Unavailable(
            "fake store is offline".to_owned(),
        ));
    }
    Ok(())
}

#[async_trait]
impl AccessRoleUnitOfWork for FakeUnitOfWork {
    async fn find(&mut self) -> StoreResult<BTreeSet<AssignmentScope>> {
        let state = self.state.lock().await;
        ensure_available(&state)?;
        Ok(state
            .rows
            .iter()
            .filter(|row| {
                row.user_id() == self.user_id
                    && row.role() == &self.role
                    && !state.hidden_from_reads.contains(*row)
            })
            .map(|row| row.scope().clone())
            .collect())
    }

    async fn delete(&mut self, scope: &AssignmentScope) -> StoreResult<bool> {
        let assignment = self.assignment(scope);
        let mut state = self.state.lock().await;
        ensure_available(&state)?;
        let removed = state.rows.remove(&assignment);
        if removed {
            state.deletes += 1;
        }
        Ok(removed)
    }

    async fn create_if_absent(&mut self, scope: &AssignmentScope) -> StoreResult<()> {
        let assignment = self.assignment(scope);
        let mut state = self.state.lock().await;
        ensure_available(&state)?;
        if !state.rows.insert(assignment.clone()) {
            return Err(AccessRoleStoreError::DuplicateAssignment(
                assignment.to_string(),
            ));
        }
        state.inserts += 1;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let state = self.state.lock().await;
        ensure_available(&state)
    }
}

#[async_trait]
impl AccessRoleRepository for FakeAccessRoleRepository {
    async fn begin_reconciliation(
        &self,
        user_id: UserId,
        role: &RoleName,
    ) -> StoreResult<Box<dyn AccessRoleUnitOfWork>> {
        ensure_available(&*self.state.lock().await)?;
        Ok(Box::new(FakeUnitOfWork {
            state: self.state.clone(),
            user_id,
            role: role.clone(),
        }))
    }

    async fn list_assignments(&self, query: &AccessRoleQuery) -> AppResult<Vec<AccessRoleRecord>> {
        let state = self.state.lock().await;
        ensure_available(&state)?;
        Ok(state
            .rows
            .iter()
            .filter(|row| query.matches(row))
            .map(|row| AccessRoleRecord {
                assignment: row.clone(),
                created_at: Utc::now(),
            })
            .collect())
    }

    async fn grant(&self, assignment: &AccessRoleAssignment) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        ensure_available(&state)?;
        Ok(state.rows.insert(assignment.clone()))
    }

    async fn revoke(&self, assignment: &AccessRoleAssignment) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        ensure_available(&state)?;
        Ok(state.rows.remove(assignment))
    }
}

/// Course-creator repository double keyed by user.
#[derive(Clone, Default)]
pub(crate) struct FakeCourseCreatorRepository {
    statuses: Arc<Mutex<HashMap<UserId, CourseCreatorStatus>>>,
    upserts: Arc<Mutex<usize>>,
    unavailable: Arc<Mutex<bool>>,
}

impl FakeCourseCreatorRepository {
    pub(crate) async fn status(&self, user_id: UserId) -> Option<CourseCreatorStatus> {
        self.statuses.lock().await.get(&user_id).copied()
    }

    pub(crate) async fn record_count(&self) -> usize {
        self.statuses.lock().await.len()
    }

    pub(crate) async fn upsert_count(&self) -> usize {
        *self.upserts.lock().await
    }

    pub(crate) async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().await = unavailable;
    }

    async fn ensure_available(&self) -> AppResult<()> {
        if *self.unavailable.lock().await {
            return Err(AppError::Unavailable(
                "fake course creator store is offline".to_owned(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CourseCreatorRepository for FakeCourseCreatorRepository {
    async fn find_status(&self, user_id: UserId) -> AppResult<Option<CourseCreatorStatus>> {
        self.ensure_available().await?;
        Ok(self.statuses.lock().await.get(&user_id).copied())
    }

    async fn upsert_status(
        &self,
        status: CourseCreatorStatus,
    ) -> AppResult<Option<CourseCreatorState>> {
        self.ensure_available().await?;
        *self.upserts.lock().await += 1;
        Ok(self
            .statuses
            .lock()
            .await
            .insert(status.user_id, status)
            .map(|previous| previous.state))
    }

    async fn update_existing_status(&self, status: CourseCreatorStatus) -> AppResult<bool> {
        self.ensure_available().await?;
        let mut statuses = self.statuses.lock().await;
        match statuses.get_mut(&status.user_id) {
            Some(existing) => {
                *existing = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Groups rows by (user, role) for assertions over whole store contents.
pub(crate) async fn snapshot(
    repository: &FakeAccessRoleRepository,
) -> BTreeMap<(UserId, String), BTreeSet<String>> {
    let mut grouped: BTreeMap<(UserId, String), BTreeSet<String>> = BTreeMap::new();
    for row in repository.rows().await {
        grouped
            .entry((row.user_id(), row.role().as_str().to_owned()))
            .or_default()
            .insert(row.org().as_str().to_owned());
    }
    grouped
}
