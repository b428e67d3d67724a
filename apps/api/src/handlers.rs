pub mod access_roles;
pub mod course_creators;
pub mod health;
pub mod identity_assertions;
