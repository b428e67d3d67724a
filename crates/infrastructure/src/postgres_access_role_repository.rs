use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};
use tracing::warn;

use colaraz_application::{
    AccessRoleQuery, AccessRoleRecord, AccessRoleRepository, AccessRoleStoreError,
    AccessRoleUnitOfWork, StoreResult,
};
use colaraz_core::{AppError, AppResult, UserId};
use colaraz_domain::{AccessRoleAssignment, AssignmentScope, CourseScope, OrgScope, RoleName};

mod admin;
mod unit_of_work;


use unit_of_work::PostgresAccessRoleUnitOfWork;

/// PostgreSQL-backed repository for course access roles.
#[derive(Clone)]
pub struct PostgresAccessRoleRepository {
    pool: PgPool,
}

impl PostgresAccessRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AssignmentRow {
    user_id: i64,
    role: String,
    org: String,
    course_id: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct ScopeRow {
    org: String,
    course_id: String,
}

#[async_trait]
impl AccessRoleRepository for PostgresAccessRoleRepository {
    async fn begin_reconciliation(
        &self,
        user_id: UserId,
        role: &RoleName,
    ) -> StoreResult<Box<dyn AccessRoleUnitOfWork>> {
        let unit_of_work = PostgresAccessRoleUnitOfWork::begin(&self.pool, user_id, role).await?;
        Ok(Box::new(unit_of_work))
    }

    async fn list_assignments(&self, query: &AccessRoleQuery) -> AppResult<Vec<AccessRoleRecord>> {
        self.list_assignments_impl(query).await
    }

    async fn grant(&self, assignment: &AccessRoleAssignment) -> AppResult<bool> {
        self.grant_impl(assignment).await
    }

    async fn revoke(&self, assignment: &AccessRoleAssignment) -> AppResult<bool> {
        self.revoke_impl(assignment).await
    }
}

/// Key of the transaction-scoped advisory lock guarding one (user, role) pair.
fn advisory_lock_key(user_id: UserId, role: &RoleName) -> String {
    format!("access_role_assignments:{user_id}:{role}")
}

fn scope_from_row(row: ScopeRow) -> StoreResult<AssignmentScope> {
    let course_scope = CourseScope::from_storage(row.course_id.as_str()).map_err(|error| {
        AccessRoleStoreError::Internal(format!(
            "stored course id '{}' is invalid: {error}",
            row.course_id
        ))
    })?;

    Ok(AssignmentScope::new(OrgScope::new(row.org), course_scope))
}

fn record_from_row(row: AssignmentRow) -> AppResult<AccessRoleRecord> {
    let user_id = UserId::new(row.user_id)?;
    let role = RoleName::new(row.role)?;
    let course_scope = CourseScope::from_storage(row.course_id.as_str()).map_err(|error| {
        AppError::Internal(format!(
            "stored course id '{}' is invalid: {error}",
            row.course_id
        ))
    })?;

    Ok(AccessRoleRecord {
        assignment: AccessRoleAssignment::new(user_id, role, OrgScope::new(row.org), course_scope),
        created_at: row.created_at,
    })
}

/// Classifies a sqlx failure. Connectivity failures are retryable outages.
pub(crate) fn map_store_error(error: sqlx::Error, action: &str) -> AccessRoleStoreError {
    match &error {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::WorkerCrashed => {
            warn!(%error, action, "access role store unavailable");
            AccessRoleStoreError::Unavailable(format!("failed to {action}: {error}"))
        }
        _ => AccessRoleStoreError::Internal(format!("failed to {action}: {error}")),
    }
}

pub(crate) fn map_app_error(error: sqlx::Error, action: &str) -> AppError {
    map_store_error(error, action).into()
}
