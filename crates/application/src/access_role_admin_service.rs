use std::sync::Arc;

use tracing::info;

use colaraz_core::{ActorIdentity, AppError, AppResult, UserId};
use colaraz_domain::{
    AccessRoleAssignment, COURSE_CREATOR_ROLE, CourseKey, CourseScope, OrgScope,
    ORG_ROLE_MANAGER_ROLE, RoleCatalog, RoleKind, RoleName,
};

use crate::access_role_ports::{AccessRoleQuery, AccessRoleRecord, AccessRoleRepository};
use crate::course_creator_gate::CourseCreatorGate;

mod checks;
mod grants;
mod listing;


/// Input payload for granting catalog roles to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantRolesInput {
    /// User receiving the roles.
    pub user_id: UserId,
    /// Organisation the roles apply in.
    pub org: OrgScope,
    /// Catalog role keys, `org_` prefixed for organisation-wide roles.
    pub roles: Vec<String>,
    /// Courses for course-level roles.
    pub course_ids: Vec<String>,
}

/// Organisation known to the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownOrganization {
    /// Display name.
    pub name: String,
    /// Short name used in course keys.
    pub short_name: String,
}

/// Where an actor may administer access roles.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AdminReach {
    Everywhere,
    Organizations(Vec<OrgScope>),
}

impl AdminReach {
    fn covers(&self, org: &OrgScope) -> bool {
        match self {
            Self::Everywhere => true,
            Self::Organizations(managed) => managed.iter().any(|managed| managed == org),
        }
    }
}

/// Administrative operations over access roles for staff and role managers.
#[derive(Clone)]
pub struct AccessRoleAdminService {
    repository: Arc<dyn AccessRoleRepository>,
    gate: CourseCreatorGate,
    catalog: RoleCatalog,
}

impl AccessRoleAdminService {
    /// Creates the service from its collaborators.
    #[must_use]
    pub fn new(repository: Arc<dyn AccessRoleRepository>, gate: CourseCreatorGate) -> Self {
        Self {
            repository,
            gate,
            catalog: RoleCatalog,
        }
    }

    /// Returns the organisations in which the user is a role manager.
    pub async fn managed_organizations(&self, user_id: UserId) -> AppResult<Vec<OrgScope>> {
        let query = AccessRoleQuery {
            user_id: Some(user_id),
            roles: vec![role_name(ORG_ROLE_MANAGER_ROLE)?],
            org_wide_only: true,
            ..AccessRoleQuery::default()
        };

        let mut orgs: Vec<OrgScope> = self
            .repository
            .list_assignments(&query)
            .await?
            .into_iter()
            .map(|record| record.assignment.org().clone())
            .collect();
        orgs.sort();
        orgs.dedup();
        Ok(orgs)
    }

    /// Returns whether the user manages roles in at least one organisation.
    pub async fn is_organizational_role_manager(&self, user_id: UserId) -> AppResult<bool> {
        Ok(!self.managed_organizations(user_id).await?.is_empty())
    }

    async fn admin_reach(&self, actor: &ActorIdentity) -> AppResult<AdminReach> {
        if actor.is_staff() {
            return Ok(AdminReach::Everywhere);
        }

        let managed = self.managed_organizations(actor.user_id()).await?;
        if managed.is_empty() {
            return Err(AppError::Forbidden(format!(
                "user '{}' is neither staff nor an organizational role manager",
                actor.user_id()
            )));
        }

        Ok(AdminReach::Organizations(managed))
    }

    async fn require_reach(&self, actor: &ActorIdentity, org: &OrgScope) -> AppResult<AdminReach> {
        let reach = self.admin_reach(actor).await?;
        if !org.is_unscoped() && !reach.covers(org) {
            return Err(AppError::Forbidden(format!(
                "user '{}' cannot manage roles in organization '{org}'",
                actor.user_id()
            )));
        }

        Ok(reach)
    }
}

fn role_name(value: &str) -> AppResult<RoleName> {
    RoleName::new(value)
}
