use std::sync::Arc;

use colaraz_application::{AccessRoleAdminService, CourseCreatorGate, IdentityAssertionService};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub identity_assertion_service: IdentityAssertionService,
    pub course_creator_gate: CourseCreatorGate,
    pub access_role_admin_service: AccessRoleAdminService,
    pub postgres_pool: Option<PgPool>,
    pub internal_api_token: Arc<str>,
}
