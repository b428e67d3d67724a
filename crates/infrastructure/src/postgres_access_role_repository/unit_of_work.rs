use std::collections::BTreeSet;

use super::*;

/// Transaction holding the advisory lock of one (user, role) pair.
///
/// Dropping it without `commit` rolls the transaction back, which also
/// releases the lock.
pub(super) struct PostgresAccessRoleUnitOfWork {
    transaction: Transaction<'static, Postgres>,
    user_id: UserId,
    role: RoleName,
}

impl PostgresAccessRoleUnitOfWork {
    pub(super) async fn begin(pool: &PgPool, user_id: UserId, role: &RoleName) -> StoreResult<Self> {
        let mut transaction = pool
            .begin()
            .await
            .map_err(|error| map_store_error(error, "begin access role transaction"))?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(advisory_lock_key(user_id, role))
            .execute(&mut *transaction)
            .await
            .map_err(|error| map_store_error(error, "lock access role key"))?;

        Ok(Self {
            transaction,
            user_id,
            role: role.clone(),
        })
    }
}

#[async_trait]
impl AccessRoleUnitOfWork for PostgresAccessRoleUnitOfWork {
    async fn find(&mut self) -> StoreResult<BTreeSet<AssignmentScope>> {
        let rows = sqlx::query_as::<_, ScopeRow>(
            r#"
            SELECT org, course_id
            FROM access_role_assignments
            WHERE user_id = $1 AND role = $2
            ORDER BY org, course_id
            "#,
        )
        .bind(self.user_id.as_i64())
        .bind(self.role.as_str())
        .fetch_all(&mut *self.transaction)
        .await
        .map_err(|error| map_store_error(error, "read access roles"))?;

        rows.into_iter().map(scope_from_row).collect()
    }

    async fn delete(&mut self, scope: &AssignmentScope) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM access_role_assignments
            WHERE user_id = $1 AND role = $2 AND org = $3 AND course_id = $4
            "#,
        )
        .bind(self.user_id.as_i64())
        .bind(self.role.as_str())
        .bind(scope.org.as_str())
        .bind(scope.course_scope.as_storage_str())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| map_store_error(error, "delete access role"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_if_absent(&mut self, scope: &AssignmentScope) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO access_role_assignments (user_id, role, org, course_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, role, org, course_id) DO NOTHING
            "#,
        )
        .bind(self.user_id.as_i64())
        .bind(self.role.as_str())
        .bind(scope.org.as_str())
        .bind(scope.course_scope.as_storage_str())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| map_store_error(error, "insert access role"))?;

        if result.rows_affected() == 0 {
            return Err(AccessRoleStoreError::DuplicateAssignment(format!(
                "{}:{}:{}:{}",
                self.user_id,
                self.role,
                scope.org,
                scope.course_scope.as_storage_str()
            )));
        }

        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.transaction
            .commit()
            .await
            .map_err(|error| map_store_error(error, "commit access role transaction"))
    }
}
