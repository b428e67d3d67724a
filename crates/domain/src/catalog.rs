//! Known access roles and how they are presented.

use crate::access_role::AccessRoleAssignment;

/// Platform-wide role that allows authoring new courses.
pub const COURSE_CREATOR_ROLE: &str = "course_creator_group";
/// Course or org-wide staff role.
pub const STAFF_ROLE: &str = "staff";
/// Course or org-wide instructor role.
pub const INSTRUCTOR_ROLE: &str = "instructor";
/// Org-wide role that allows managing other users' roles inside the org.
pub const ORG_ROLE_MANAGER_ROLE: &str = "org_role_manager";
/// Prefix marking a catalog role as organisation-wide.
pub const ORG_ROLE_PREFIX: &str = "org_";

/// Roles bundled when a user is promoted to LMS admin of an organisation.
pub const LMS_ADMIN_ROLES: [&str; 4] = [
    STAFF_ROLE,
    INSTRUCTOR_ROLE,
    ORG_ROLE_MANAGER_ROLE,
    COURSE_CREATOR_ROLE,
];

/// Granularity a catalog role is granted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleKind {
    /// Applies platform-wide with no org.
    Global,
    /// Applies to a whole organisation.
    Organizational,
    /// Applies to individual courses.
    Course,
}

/// Catalog entry describing a grantable role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogRole {
    /// Catalog key, `org_` prefixed for organisational roles.
    pub key: &'static str,
    /// Human readable name.
    pub display_name: &'static str,
    /// Granularity.
    pub kind: RoleKind,
}

const CATALOG: &[CatalogRole] = &[
    CatalogRole {
        key: COURSE_CREATOR_ROLE,
        display_name: "Course Creator",
        kind: RoleKind::Global,
    },
    CatalogRole {
        key: "org_instructor",
        display_name: "Organizational Instructor",
        kind: RoleKind::Organizational,
    },
    CatalogRole {
        key: "org_staff",
        display_name: "Organizational Staff",
        kind: RoleKind::Organizational,
    },
    CatalogRole {
        key: "finance_admin",
        display_name: "Finance Admin",
        kind: RoleKind::Course,
    },
    CatalogRole {
        key: "support",
        display_name: "Support",
        kind: RoleKind::Course,
    },
    CatalogRole {
        key: "beta_testers",
        display_name: "Beta Testers",
        kind: RoleKind::Course,
    },
    CatalogRole {
        key: "sales_admin",
        display_name: "Sales Admin",
        kind: RoleKind::Course,
    },
    CatalogRole {
        key: "library_user",
        display_name: "Library User",
        kind: RoleKind::Course,
    },
    CatalogRole {
        key: INSTRUCTOR_ROLE,
        display_name: "Instructor",
        kind: RoleKind::Course,
    },
    CatalogRole {
        key: STAFF_ROLE,
        display_name: "Staff",
        kind: RoleKind::Course,
    },
];

/// Read-only lookup over the grantable roles.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleCatalog;

impl RoleCatalog {
    /// Returns every catalog entry.
    #[must_use]
    pub fn all(&self) -> &'static [CatalogRole] {
        CATALOG
    }

    /// Finds a catalog entry by key.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&'static CatalogRole> {
        CATALOG.iter().find(|role| role.key == key)
    }

    /// Returns the display name of a stored assignment.
    ///
    /// Org-wide rows are stored without the `org_` prefix, so they are looked up
    /// under the prefixed catalog key.
    #[must_use]
    pub fn display_name(&self, assignment: &AccessRoleAssignment) -> Option<&'static str> {
        let role = assignment.role().as_str();
        let key = if !assignment.course_scope().is_empty() || role == COURSE_CREATOR_ROLE {
            role.to_owned()
        } else {
            format!("{ORG_ROLE_PREFIX}{role}")
        };

        self.find(key.as_str()).map(|entry| entry.display_name)
    }
}

/// Splits an `org_` prefixed role key into its stored role name.
#[must_use]
pub fn strip_org_prefix(role: &str) -> Option<&str> {
    role.strip_prefix(ORG_ROLE_PREFIX)
        .filter(|stripped| !stripped.is_empty())
}
