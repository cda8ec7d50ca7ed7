//! Tour Insights Use Case
//!
//! Read-only views computed over the whole tour collection.

use std::sync::Arc;

use crate::application::config::TourConfig;
use crate::domain::entities::Tour;
use crate::domain::repository::TourRepository;
use crate::domain::services::{self, DifficultyStats, MonthPlan};
use crate::error::TourResult;

pub struct TourInsightsUseCase<T>
where
    T: TourRepository,
{
    tour_repo: Arc<T>,
    config: Arc<TourConfig>,
}

impl<T> TourInsightsUseCase<T>
where
    T: TourRepository,
{
    pub fn new(tour_repo: Arc<T>, config: Arc<TourConfig>) -> Self {
        Self { tour_repo, config }
    }

    pub async fn top_cheap(&self) -> TourResult<Vec<Tour>> {
        let tours = self.tour_repo.list().await?;
        Ok(services::top_cheap(tours, self.config.top_tours_limit))
    }

    pub async fn stats(&self) -> TourResult<Vec<DifficultyStats>> {
        let tours = self.tour_repo.list().await?;
        Ok(services::tour_stats(&tours, self.config.stats_min_rating))
    }

    pub async fn monthly_plan(&self, year: i32) -> TourResult<Vec<MonthPlan>> {
        let tours = self.tour_repo.list().await?;
        Ok(services::monthly_plan(
            &tours,
            year,
            self.config.monthly_plan_limit,
        ))
    }
}
