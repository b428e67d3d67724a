//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_access_role_repository;
mod in_memory_course_creator_repository;
mod postgres_access_role_repository;
mod postgres_course_creator_repository;

pub use in_memory_access_role_repository::InMemoryAccessRoleRepository;
pub use in_memory_course_creator_repository::InMemoryCourseCreatorRepository;
pub use postgres_access_role_repository::PostgresAccessRoleRepository;
pub use postgres_course_creator_repository::PostgresCourseCreatorRepository;
