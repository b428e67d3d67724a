use std::sync::Arc;

use colaraz_application::{
    AccessRoleAdminService, AccessRoleRepository, CourseCreatorGate, CourseCreatorRepository,
    IdentityAssertionService, RoleReconciler,
};
use colaraz_core::AppError;
use colaraz_infrastructure::{
    InMemoryAccessRoleRepository, InMemoryCourseCreatorRepository, PostgresAccessRoleRepository,
    PostgresCourseCreatorRepository,
};
use sqlx::PgPool;
use tracing::warn;

use crate::api_config::{ApiConfig, StoreBackend};
use crate::state::AppState;

struct RepositorySet {
    access_role_repository: Arc<dyn AccessRoleRepository>,
    course_creator_repository: Arc<dyn CourseCreatorRepository>,
}

fn build_repository_set(
    backend: StoreBackend,
    pool: Option<&PgPool>,
) -> Result<RepositorySet, AppError> {
    match (backend, pool) {
        (StoreBackend::Postgres, Some(pool)) => Ok(RepositorySet {
            access_role_repository: Arc::new(PostgresAccessRoleRepository::new(pool.clone())),
            course_creator_repository: Arc::new(PostgresCourseCreatorRepository::new(
                pool.clone(),
            )),
        }),
        (StoreBackend::Postgres, None) => Err(AppError::Validation(
            "postgres store backend requires a database pool".to_owned(),
        )),
        (StoreBackend::Memory, _) => {
            warn!("using in-memory access role store; data is lost on restart");
            Ok(RepositorySet {
                access_role_repository: Arc::new(InMemoryAccessRoleRepository::new()),
                course_creator_repository: Arc::new(InMemoryCourseCreatorRepository::new()),
            })
        }
    }
}

pub fn build_app_state(pool: Option<PgPool>, config: &ApiConfig) -> Result<AppState, AppError> {
    let repositories = build_repository_set(config.store_backend, pool.as_ref())?;

    let course_creator_gate = CourseCreatorGate::new(repositories.course_creator_repository);
    let role_reconciler = RoleReconciler::new(repositories.access_role_repository.clone());

    Ok(AppState {
        identity_assertion_service: IdentityAssertionService::new(
            role_reconciler,
            course_creator_gate.clone(),
        ),
        access_role_admin_service: AccessRoleAdminService::new(
            repositories.access_role_repository,
            course_creator_gate.clone(),
        ),
        course_creator_gate,
        postgres_pool: pool,
        internal_api_token: Arc::from(config.internal_api_token.as_str()),
    })
}
