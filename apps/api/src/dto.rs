mod access_roles;
mod assertions;
mod common;
mod course_creators;

pub use access_roles::{
    AccessRoleResponse, CourseAdminAccessQuery, CourseAdminAccessResponse,
    CourseCreationOrganizationsRequest, GrantAccessRolesRequest, KnownOrganizationRequest,
    MakeLmsAdminRequest, RevokeAccessRoleRequest,
};
pub use assertions::{
    AssertionOutcomeResponse, IdentityAssertionRequest, RoleClaimRequest,
    RoleReconcileResultResponse, SkippedRoleClaimResponse,
};
pub use common::{HealthDependencyStatus, HealthResponse};
pub use course_creators::{CourseCreatorStatusResponse, UpdateCourseCreatorRequest};
