use super::*;

use colaraz_domain::{INSTRUCTOR_ROLE, STAFF_ROLE};

impl AccessRoleAdminService {
    /// Returns whether the user holds instructor or staff access for a course.
    ///
    /// Org-wide rows count when their org matches `user_org` ignoring case.
    pub async fn has_course_admin_access(
        &self,
        user_id: UserId,
        course_key: &CourseKey,
        user_org: &str,
    ) -> AppResult<bool> {
        let query = AccessRoleQuery {
            user_id: Some(user_id),
            roles: vec![role_name(INSTRUCTOR_ROLE)?, role_name(STAFF_ROLE)?],
            ..AccessRoleQuery::default()
        };

        let records = self.repository.list_assignments(&query).await?;
        Ok(records.iter().any(|record| {
            let assignment = &record.assignment;
            match assignment.course_scope() {
                CourseScope::Course(held) => held == course_key,
                CourseScope::Empty => {
                    !user_org.trim().is_empty() && assignment.org().eq_ignore_case(user_org)
                }
            }
        }))
    }

    /// Returns short names of the organisations the user may create courses in.
    pub async fn course_creation_organizations(
        &self,
        user_id: UserId,
        is_superuser: bool,
        known_orgs: &[KnownOrganization],
    ) -> AppResult<Vec<String>> {
        if is_superuser {
            return Ok(known_orgs
                .iter()
                .map(|org| org.short_name.clone())
                .collect());
        }

        let query = AccessRoleQuery {
            user_id: Some(user_id),
            roles: vec![role_name(COURSE_CREATOR_ROLE)?],
            ..AccessRoleQuery::default()
        };
        let held: Vec<OrgScope> = self
            .repository
            .list_assignments(&query)
            .await?
            .into_iter()
            .map(|record| record.assignment.org().clone())
            .filter(|org| !org.is_unscoped())
            .collect();

        Ok(known_orgs
            .iter()
            .filter(|known| {
                held.iter()
                    .any(|org| org.as_str() == known.name || org.as_str() == known.short_name)
            })
            .map(|known| known.short_name.clone())
            .collect())
    }
}
