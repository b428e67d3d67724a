use std::sync::Arc;

use colaraz_application::{
    AccessRoleAdminService, CourseCreatorGate, IdentityAssertionService, RoleReconciler,
};
use colaraz_core::{ActorIdentity, UserId};
use colaraz_infrastructure::{InMemoryAccessRoleRepository, InMemoryCourseCreatorRepository};

use crate::state::AppState;

pub(crate) const TEST_INTERNAL_TOKEN: &str = "test-internal-token-with-32-characters";

pub(crate) fn in_memory_state() -> AppState {
    let access_roles = Arc::new(InMemoryAccessRoleRepository::new());
    let course_creator_gate =
        CourseCreatorGate::new(Arc::new(InMemoryCourseCreatorRepository::new()));

    AppState {
        identity_assertion_service: IdentityAssertionService::new(
            RoleReconciler::new(access_roles.clone()),
            course_creator_gate.clone(),
        ),
        access_role_admin_service: AccessRoleAdminService::new(
            access_roles,
            course_creator_gate.clone(),
        ),
        course_creator_gate,
        postgres_pool: None,
        internal_api_token: Arc::from(TEST_INTERNAL_TOKEN),
    }
}

pub(crate) fn actor(user_id: i64, is_staff: bool) -> ActorIdentity {
    match UserId::new(user_id) {
        Ok(user_id) => ActorIdentity::new(user_id, is_staff),
        Err(error) => panic!("invalid actor fixture: {error}"),
    }
}
