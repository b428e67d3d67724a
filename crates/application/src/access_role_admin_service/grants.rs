use std::collections::BTreeSet;

use super::*;

use colaraz_domain::{LMS_ADMIN_ROLES, strip_org_prefix};

impl AccessRoleAdminService {
    /// Grants catalog roles to a user and returns the assignments now held.
    ///
    /// Rows that already exist are kept as they are.
    pub async fn grant_roles(
        &self,
        actor: &ActorIdentity,
        input: GrantRolesInput,
    ) -> AppResult<Vec<AccessRoleAssignment>> {
        self.require_reach(actor, &input.org).await?;

        let course_keys = input
            .course_ids
            .iter()
            .filter(|course_id| !course_id.trim().is_empty())
            .map(CourseKey::parse)
            .collect::<AppResult<Vec<_>>>()?;

        let mut assignments = BTreeSet::new();
        for key in &input.roles {
            assignments.extend(self.expand_catalog_role(
                input.user_id,
                key,
                &input.org,
                &course_keys,
            )?);
        }

        let mut created = 0_usize;
        for assignment in &assignments {
            if self.repository.grant(assignment).await? {
                created += 1;
            }
        }

        if assignments
            .iter()
            .any(|assignment| assignment.role().as_str() == COURSE_CREATOR_ROLE)
        {
            self.gate
                .set_course_creator_flag(input.user_id, true, actor.user_id())
                .await?;
        }

        info!(
            user_id = %input.user_id,
            actor = %actor.user_id(),
            org = %input.org,
            requested = assignments.len(),
            created,
            "granted access roles"
        );

        Ok(assignments.into_iter().collect())
    }

    /// Grants the LMS admin bundle for one organisation.
    pub async fn make_lms_admin(
        &self,
        actor: &ActorIdentity,
        user_id: UserId,
        org: OrgScope,
    ) -> AppResult<Vec<AccessRoleAssignment>> {
        if org.is_unscoped() {
            return Err(AppError::Validation(
                "organization is required to make an LMS admin".to_owned(),
            ));
        }

        self.require_reach(actor, &org).await?;

        let mut assignments = Vec::with_capacity(LMS_ADMIN_ROLES.len());
        for role in LMS_ADMIN_ROLES {
            let role = role_name(role)?;
            let assignment = if role.as_str() == COURSE_CREATOR_ROLE {
                AccessRoleAssignment::global(user_id, role)
            } else {
                AccessRoleAssignment::new(user_id, role, org.clone(), CourseScope::Empty)
            };
            self.repository.grant(&assignment).await?;
            assignments.push(assignment);
        }

        self.gate
            .set_course_creator_flag(user_id, true, actor.user_id())
            .await?;

        info!(%user_id, actor = %actor.user_id(), %org, "granted lms admin roles");
        Ok(assignments)
    }

    /// Removes one assignment. Removing the course-creator row also denies the gate.
    pub async fn revoke_assignment(
        &self,
        actor: &ActorIdentity,
        assignment: &AccessRoleAssignment,
    ) -> AppResult<()> {
        self.require_reach(actor, assignment.org()).await?;
        if !actor.is_staff() && assignment.role().as_str() == ORG_ROLE_MANAGER_ROLE {
            return Err(AppError::Forbidden(
                "only staff can revoke role manager access".to_owned(),
            ));
        }

        if !self.repository.revoke(assignment).await? {
            return Err(AppError::NotFound(format!(
                "access role assignment '{assignment}' does not exist"
            )));
        }

        if assignment.role().as_str() == COURSE_CREATOR_ROLE {
            self.gate
                .revoke_course_creator_access(assignment.user_id(), actor.user_id())
                .await?;
        }

        info!(%assignment, actor = %actor.user_id(), "access role deleted");
        Ok(())
    }

    fn expand_catalog_role(
        &self,
        user_id: UserId,
        key: &str,
        org: &OrgScope,
        course_keys: &[CourseKey],
    ) -> AppResult<Vec<AccessRoleAssignment>> {
        let Some(entry) = self.catalog.find(key.trim()) else {
            return Err(AppError::Validation(format!("unknown access role '{key}'")));
        };

        match entry.kind {
            RoleKind::Global => Ok(vec![AccessRoleAssignment::global(
                user_id,
                role_name(entry.key)?,
            )]),
            RoleKind::Organizational => {
                require_org(org, entry.key)?;
                let stored = strip_org_prefix(entry.key).unwrap_or(entry.key);
                Ok(vec![AccessRoleAssignment::new(
                    user_id,
                    role_name(stored)?,
                    org.clone(),
                    CourseScope::Empty,
                )])
            }
            RoleKind::Course => {
                if course_keys.is_empty() {
                    return Ok(Vec::new());
                }
                require_org(org, entry.key)?;
                let role = role_name(entry.key)?;
                Ok(course_keys
                    .iter()
                    .map(|course_key| {
                        AccessRoleAssignment::new(
                            user_id,
                            role.clone(),
                            org.clone(),
                            CourseScope::Course(course_key.clone()),
                        )
                    })
                    .collect())
            }
        }
    }
}

fn require_org(org: &OrgScope, role: &str) -> AppResult<()> {
    if org.is_unscoped() {
        return Err(AppError::Validation(format!(
            "organization is required for role '{role}'"
        )));
    }

    Ok(())
}
