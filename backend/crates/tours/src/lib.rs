//! Tours Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Tour and review entities, aggregation services, repository traits
//! - `application/` - Use cases
//! - `infra/` - Database and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Access Model
//! - Reading tours, stats and reviews is public
//! - Tour writes need Admin or LeadGuide; the monthly plan also admits Guides
//! - Only Users write reviews; authors or Admins delete them
//! - A tour's `ratingsAverage`/`ratingsQuantity` are recomputed on every review write

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::TourConfig;
pub use error::{TourError, TourResult};
pub use infra::{memory::MemoryTourRepository, postgres::PgTourRepository};
pub use presentation::{TourAppState, reviews_router, tours_router};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

#[cfg(test)]
mod tests;
