use super::*;

impl AccessRoleAdminService {
    /// Lists the assignments visible to the actor.
    ///
    /// Role manager rows are never listed. Role managers only see rows in the
    /// organisations they manage plus global rows.
    pub async fn list_assignments(&self, actor: &ActorIdentity) -> AppResult<Vec<AccessRoleRecord>> {
        let orgs = match self.admin_reach(actor).await? {
            AdminReach::Everywhere => None,
            AdminReach::Organizations(managed) => {
                let mut visible = vec![OrgScope::unscoped()];
                visible.extend(managed);
                Some(visible)
            }
        };

        let query = AccessRoleQuery {
            excluded_roles: vec![role_name(ORG_ROLE_MANAGER_ROLE)?],
            orgs,
            ..AccessRoleQuery::default()
        };

        self.repository.list_assignments(&query).await
    }

    /// Returns the catalog display name of an assignment.
    #[must_use]
    pub fn display_name(&self, assignment: &AccessRoleAssignment) -> Option<&'static str> {
        self.catalog.display_name(assignment)
    }
}
