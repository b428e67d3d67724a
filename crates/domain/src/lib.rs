//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access_role;
mod assertion;
mod catalog;
mod course_creator;
mod reconciliation;

pub use access_role::{
    AccessRoleAssignment, AssignmentScope, CourseKey, CourseScope, OrgScope, RoleName,
};
pub use assertion::{
    IdentityAssertion, InvalidRoleClaim, RoleClaim, RoleClaimPayload, ValidatedAssertion,
};
pub use catalog::{
    COURSE_CREATOR_ROLE, CatalogRole, INSTRUCTOR_ROLE, LMS_ADMIN_ROLES, ORG_ROLE_MANAGER_ROLE,
    ORG_ROLE_PREFIX, RoleCatalog, RoleKind, STAFF_ROLE, strip_org_prefix,
};
pub use course_creator::{CourseCreatorState, CourseCreatorStatus};
pub use reconciliation::ReconciliationPlan;
