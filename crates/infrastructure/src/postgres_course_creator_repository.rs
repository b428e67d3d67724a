use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use colaraz_application::CourseCreatorRepository;
use colaraz_core::{AppError, AppResult, UserId};
use colaraz_domain::{CourseCreatorState, CourseCreatorStatus};

use crate::postgres_access_role_repository::map_app_error;

/// PostgreSQL-backed repository for course-creator records.
#[derive(Clone)]
pub struct PostgresCourseCreatorRepository {
    pool: PgPool,
}

impl PostgresCourseCreatorRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct StatusRow {
    user_id: i64,
    state: String,
    approved_by: i64,
}

impl TryFrom<StatusRow> for CourseCreatorStatus {
    type Error = AppError;

    fn try_from(row: StatusRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId::new(row.user_id)?,
            state: CourseCreatorState::from_str(row.state.as_str())?,
            approved_by: UserId::new(row.approved_by)?,
        })
    }
}

#[async_trait]
impl CourseCreatorRepository for PostgresCourseCreatorRepository {
    async fn find_status(&self, user_id: UserId) -> AppResult<Option<CourseCreatorStatus>> {
        let row = sqlx::query_as::<_, StatusRow>(
            r#"
            SELECT user_id, state, approved_by
            FROM course_creator_statuses
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_app_error(error, "read course creator status"))?;

        row.map(CourseCreatorStatus::try_from).transpose()
    }

    async fn upsert_status(
        &self,
        status: CourseCreatorStatus,
    ) -> AppResult<Option<CourseCreatorState>> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| map_app_error(error, "begin course creator transaction"))?;

        let previous = sqlx::query_scalar::<_, String>(
            r#"
            SELECT state
            FROM course_creator_statuses
            WHERE user_id = $1
            FOR UPDATE
            "#,
        )
        .bind(status.user_id.as_i64())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| map_app_error(error, "read course creator status"))?;

        sqlx::query(
            r#"
            INSERT INTO course_creator_statuses (user_id, state, approved_by)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET state = EXCLUDED.state,
                approved_by = EXCLUDED.approved_by,
                updated_at = now()
            "#,
        )
        .bind(status.user_id.as_i64())
        .bind(status.state.as_str())
        .bind(status.approved_by.as_i64())
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_app_error(error, "upsert course creator status"))?;

        transaction
            .commit()
            .await
            .map_err(|error| map_app_error(error, "commit course creator status"))?;

        previous
            .map(|state| CourseCreatorState::from_str(state.as_str()))
            .transpose()
    }

    async fn update_existing_status(&self, status: CourseCreatorStatus) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE course_creator_statuses
            SET state = $2, approved_by = $3, updated_at = now()
            WHERE user_id = $1
            "#,
        )
        .bind(status.user_id.as_i64())
        .bind(status.state.as_str())
        .bind(status.approved_by.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| map_app_error(error, "update course creator status"))?;

        Ok(result.rows_affected() > 0)
    }
}
