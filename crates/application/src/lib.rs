//! Application services and ports.

#![forbid(unsafe_code)]

mod access_role_admin_service;
mod access_role_ports;
mod course_creator_gate;
mod course_creator_ports;
mod identity_assertion_service;
mod role_reconciler;

#[cfg(test)]
mod test_support;

pub use access_role_admin_service::{AccessRoleAdminService, GrantRolesInput, KnownOrganization};
pub use access_role_ports::{
    AccessRoleQuery, AccessRoleRecord, AccessRoleRepository, AccessRoleStoreError,
    AccessRoleUnitOfWork, StoreResult,
};
pub use course_creator_gate::CourseCreatorGate;
pub use course_creator_ports::CourseCreatorRepository;
pub use identity_assertion_service::{AssertionOutcome, IdentityAssertionService};
pub use role_reconciler::{ReconcileResult, RoleReconciler};
