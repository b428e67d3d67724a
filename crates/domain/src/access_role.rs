use std::fmt::{Display, Formatter};

use colaraz_core::{AppError, AppResult, NonEmptyString, UserId};
use serde::{Deserialize, Serialize};

/// Validated role tag such as `staff` or `course_creator_group`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(NonEmptyString);

impl RoleName {
    /// Creates a role name, trimming surrounding whitespace.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        let name = NonEmptyString::new(trimmed)
            .map_err(|_| AppError::Validation("role name must not be empty".to_owned()))?;

        if trimmed.chars().any(char::is_whitespace) {
            return Err(AppError::Validation(format!(
                "role name '{trimmed}' must not contain whitespace"
            )));
        }

        Ok(Self(name))
    }

    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for RoleName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0.into()
    }
}

impl Display for RoleName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Organisation short name restricting where a role applies.
///
/// The empty value is the unscoped sentinel used by global roles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub struct OrgScope(String);

impl OrgScope {
    /// Creates an organisation scope from a short name.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self(value.trim().to_owned())
    }

    /// Returns the unscoped sentinel.
    #[must_use]
    pub fn unscoped() -> Self {
        Self(String::new())
    }

    /// Returns whether this is the unscoped sentinel.
    #[must_use]
    pub fn is_unscoped(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Compares two scopes ignoring ASCII case.
    #[must_use]
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl From<String> for OrgScope {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<OrgScope> for String {
    fn from(value: OrgScope) -> Self {
        value.0
    }
}

impl Display for OrgScope {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Course identifier in `course-v1:ORG+COURSE+RUN` or legacy `ORG/COURSE/RUN` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseKey {
    value: String,
    org: String,
}

const COURSE_KEY_PREFIX: &str = "course-v1:";

impl CourseKey {
    /// Parses and validates a course key.
    pub fn parse(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        let parts: Vec<&str> = match trimmed.strip_prefix(COURSE_KEY_PREFIX) {
            Some(rest) => rest.split('+').collect(),
            None => trimmed.split('/').collect(),
        };

        let is_valid = parts.len() == 3
            && parts
                .iter()
                .all(|part| !part.is_empty() && part.chars().all(is_course_key_char));
        if !is_valid {
            return Err(AppError::Validation(format!(
                "Course id invalid. Entered course id was: \"{trimmed}\"."
            )));
        }

        Ok(Self {
            value: trimmed.to_owned(),
            org: parts[0].to_owned(),
        })
    }

    /// Returns the canonical course key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.value.as_str()
    }

    /// Returns the organisation segment of the key.
    #[must_use]
    pub fn org(&self) -> &str {
        self.org.as_str()
    }
}

fn is_course_key_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '_' | '-' | '.' | '~' | '%' | ':')
}

impl TryFrom<String> for CourseKey {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CourseKey> for String {
    fn from(value: CourseKey) -> Self {
        value.value
    }
}

impl Display for CourseKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.value.as_str())
    }
}

/// Course restriction of an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum CourseScope {
    /// Org-wide or global assignment.
    #[default]
    Empty,
    /// Assignment limited to one course.
    Course(CourseKey),
}

impl CourseScope {
    /// Parses the storage representation, where the empty string is the sentinel.
    pub fn from_storage(value: &str) -> AppResult<Self> {
        if value.trim().is_empty() {
            return Ok(Self::Empty);
        }

        CourseKey::parse(value).map(Self::Course)
    }

    /// Returns the storage representation.
    #[must_use]
    pub fn as_storage_str(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Course(course_key) => course_key.as_str(),
        }
    }

    /// Returns the course key when the scope is course-specific.
    #[must_use]
    pub fn course_key(&self) -> Option<&CourseKey> {
        match self {
            Self::Empty => None,
            Self::Course(course_key) => Some(course_key),
        }
    }

    /// Returns whether the assignment is org-wide or global.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl TryFrom<String> for CourseScope {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_storage(value.as_str())
    }
}

impl From<CourseScope> for String {
    fn from(value: CourseScope) -> Self {
        value.as_storage_str().to_owned()
    }
}

/// Position of one assignment row inside a (user, role) partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssignmentScope {
    /// Organisation scope.
    pub org: OrgScope,
    /// Course scope.
    pub course_scope: CourseScope,
}

impl AssignmentScope {
    /// Creates a scope from its parts.
    #[must_use]
    pub fn new(org: OrgScope, course_scope: CourseScope) -> Self {
        Self { org, course_scope }
    }

    /// Creates an org-wide scope.
    #[must_use]
    pub fn org_wide(org: OrgScope) -> Self {
        Self::new(org, CourseScope::Empty)
    }
}

/// One grant of a named role to a user.
///
/// The tuple (user, role, org, course scope) is unique in the store; rows are
/// never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccessRoleAssignment {
    user_id: UserId,
    role: RoleName,
    scope: AssignmentScope,
}

impl AccessRoleAssignment {
    /// Creates an assignment.
    #[must_use]
    pub fn new(user_id: UserId, role: RoleName, org: OrgScope, course_scope: CourseScope) -> Self {
        Self {
            user_id,
            role,
            scope: AssignmentScope::new(org, course_scope),
        }
    }

    /// Creates a global assignment with no org or course restriction.
    #[must_use]
    pub fn global(user_id: UserId, role: RoleName) -> Self {
        Self::new(user_id, role, OrgScope::unscoped(), CourseScope::Empty)
    }

    /// Returns the assigned user.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the role tag.
    #[must_use]
    pub fn role(&self) -> &RoleName {
        &self.role
    }

    /// Returns the organisation scope.
    #[must_use]
    pub fn org(&self) -> &OrgScope {
        &self.scope.org
    }

    /// Returns the course scope.
    #[must_use]
    pub fn course_scope(&self) -> &CourseScope {
        &self.scope.course_scope
    }

    /// Returns the row position inside its (user, role) partition.
    #[must_use]
    pub fn scope(&self) -> &AssignmentScope {
        &self.scope
    }

    /// Returns whether the row applies to a whole organisation.
    #[must_use]
    pub fn is_org_wide(&self) -> bool {
        self.scope.course_scope.is_empty() && !self.scope.org.is_unscoped()
    }
}

impl Display for AccessRoleAssignment {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}:{}:{}:{}",
            self.user_id,
            self.role,
            self.scope.org,
            self.scope.course_scope.as_storage_str()
        )
    }
}
