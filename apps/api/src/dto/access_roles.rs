use colaraz_application::{AccessRoleRecord, KnownOrganization};
use colaraz_core::{AppError, UserId};
use colaraz_domain::{AccessRoleAssignment, CourseScope, OrgScope, RoleName};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of a stored access role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-role-response.ts"
)]
pub struct AccessRoleResponse {
    pub user_id: i64,
    pub role: String,
    pub org: String,
    pub course_id: Option<String>,
    pub display_name: Option<String>,
    pub created_at: String,
}

impl AccessRoleResponse {
    /// Builds a response from a stored record and its catalog display name.
    #[must_use]
    pub fn from_record(record: AccessRoleRecord, display_name: Option<&str>) -> Self {
        let assignment = record.assignment;
        Self {
            user_id: assignment.user_id().as_i64(),
            role: assignment.role().as_str().to_owned(),
            org: assignment.org().as_str().to_owned(),
            course_id: assignment
                .course_scope()
                .course_key()
                .map(|course_key| course_key.as_str().to_owned()),
            display_name: display_name.map(ToOwned::to_owned),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for granting catalog roles.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/grant-access-roles-request.ts"
)]
pub struct GrantAccessRolesRequest {
    pub user_id: i64,
    #[serde(default)]
    pub org: String,
    pub roles: Vec<String>,
    #[serde(default)]
    pub course_ids: Vec<String>,
}

/// Incoming payload identifying one assignment to revoke.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/revoke-access-role-request.ts"
)]
pub struct RevokeAccessRoleRequest {
    pub user_id: i64,
    pub role: String,
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub course_id: Option<String>,
}

impl TryFrom<RevokeAccessRoleRequest> for AccessRoleAssignment {
    type Error = AppError;

    fn try_from(value: RevokeAccessRoleRequest) -> Result<Self, Self::Error> {
        let course_scope = match value.course_id.as_deref() {
            Some(course_id) => CourseScope::from_storage(course_id)?,
            None => CourseScope::Empty,
        };

        Ok(Self::new(
            UserId::new(value.user_id)?,
            RoleName::new(value.role)?,
            OrgScope::new(value.org),
            course_scope,
        ))
    }
}

/// Incoming payload for LMS admin promotion.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/make-lms-admin-request.ts"
)]
pub struct MakeLmsAdminRequest {
    pub user_id: i64,
    pub org: String,
}

/// Query string of the course admin access check.
#[derive(Debug, Deserialize)]
pub struct CourseAdminAccessQuery {
    pub course_id: String,
    #[serde(default)]
    pub user_org: String,
}

/// Result of the course admin access check.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/course-admin-access-response.ts"
)]
pub struct CourseAdminAccessResponse {
    pub has_access: bool,
}

/// Organisation offered when creating a course.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/known-organization-request.ts"
)]
pub struct KnownOrganizationRequest {
    pub name: String,
    pub short_name: String,
}

impl From<KnownOrganizationRequest> for KnownOrganization {
    fn from(value: KnownOrganizationRequest) -> Self {
        Self {
            name: value.name,
            short_name: value.short_name,
        }
    }
}

/// Incoming payload for resolving course creation organisations.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/course-creation-organizations-request.ts"
)]
pub struct CourseCreationOrganizationsRequest {
    #[serde(default)]
    pub is_superuser: bool,
    pub organizations: Vec<KnownOrganizationRequest>,
}
