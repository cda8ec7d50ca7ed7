//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations.

pub mod config;
pub mod manage_tours;
pub mod reviews;
pub mod tour_insights;

pub use manage_tours::ManageToursUseCase;
pub use reviews::{CreateReviewInput, ReviewsUseCase};
pub use tour_insights::TourInsightsUseCase;
