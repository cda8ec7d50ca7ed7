//! Application Configuration
//!
//! Configuration for the tours application layer.

use crate::domain::services::DEFAULT_RATINGS_AVERAGE;

/// Tours application configuration
#[derive(Debug, Clone)]
pub struct TourConfig {
    /// Size of the top-cheap listing
    pub top_tours_limit: usize,
    /// Lowest average rating counted in the per-difficulty stats
    pub stats_min_rating: f64,
    /// Most months returned by the monthly plan
    pub monthly_plan_limit: usize,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            top_tours_limit: 5,
            stats_min_rating: DEFAULT_RATINGS_AVERAGE,
            monthly_plan_limit: 12,
        }
    }
}
