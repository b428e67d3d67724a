use super::*;

impl PostgresAccessRoleRepository {
    pub(super) async fn list_assignments_impl(
        &self,
        query: &AccessRoleQuery,
    ) -> AppResult<Vec<AccessRoleRecord>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT user_id, role, org, course_id, created_at FROM access_role_assignments WHERE TRUE",
        );

        if let Some(user_id) = query.user_id {
            builder.push(" AND user_id = ");
            builder.push_bind(user_id.as_i64());
        }

        if !query.roles.is_empty() {
            builder.push(" AND role = ANY(");
            builder.push_bind(role_values(&query.roles));
            builder.push(")");
        }

        if !query.excluded_roles.is_empty() {
            builder.push(" AND NOT (role = ANY(");
            builder.push_bind(role_values(&query.excluded_roles));
            builder.push("))");
        }

        if let Some(orgs) = &query.orgs {
            builder.push(" AND org = ANY(");
            builder.push_bind(
                orgs.iter()
                    .map(|org| org.as_str().to_owned())
                    .collect::<Vec<_>>(),
            );
            builder.push(")");
        }

        if query.org_wide_only {
            builder.push(" AND org <> '' AND course_id = ''");
        }

        builder.push(" ORDER BY user_id, role, org, course_id");

        let rows = builder
            .build_query_as::<AssignmentRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| map_app_error(error, "list access roles"))?;

        rows.into_iter().map(record_from_row).collect()
    }

    pub(super) async fn grant_impl(&self, assignment: &AccessRoleAssignment) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO access_role_assignments (user_id, role, org, course_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, role, org, course_id) DO NOTHING
            "#,
        )
        .bind(assignment.user_id().as_i64())
        .bind(assignment.role().as_str())
        .bind(assignment.org().as_str())
        .bind(assignment.course_scope().as_storage_str())
        .execute(&self.pool)
        .await
        .map_err(|error| map_app_error(error, "grant access role"))?;

        Ok(result.rows_affected() > 0)
    }

    pub(super) async fn revoke_impl(&self, assignment: &AccessRoleAssignment) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM access_role_assignments
            WHERE user_id = $1 AND role = $2 AND org = $3 AND course_id = $4
            "#,
        )
        .bind(assignment.user_id().as_i64())
        .bind(assignment.role().as_str())
        .bind(assignment.org().as_str())
        .bind(assignment.course_scope().as_storage_str())
        .execute(&self.pool)
        .await
        .map_err(|error| map_app_error(error, "revoke access role"))?;

        Ok(result.rows_affected() > 0)
    }
}

fn role_values(roles: &[RoleName]) -> Vec<String> {
    roles.iter().map(|role| role.as_str().to_owned()).collect()
}
