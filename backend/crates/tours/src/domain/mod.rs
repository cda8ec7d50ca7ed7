//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Tour, Review)
//! - Domain value objects (Difficulty, TourName, Rating)
//! - Domain services (rating summaries, tour statistics, role allow-lists)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
