//! Domain Layer
//!
//! Contains entities, value objects, domain services and repository traits.

pub mod entity;
pub mod repository;
pub mod service;
pub mod value_object;

// Re-exports
pub use entity::user::User;
pub use repository::UserRepository;
pub use value_object::user_role::UserRole;
