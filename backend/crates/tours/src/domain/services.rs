//! Domain Services
//!
//! Pure aggregation over tours and reviews, plus the role allow-lists
//! guarding tour and review routes.

use auth::UserRole;
use chrono::{Datelike, Month};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::entities::Tour;
use crate::domain::value_objects::{Difficulty, Rating};

/// Average shown for a tour nobody has reviewed yet.
pub const DEFAULT_RATINGS_AVERAGE: f64 = 4.5;

// ============================================================================
// Role allow-lists
// ============================================================================

/// Create, update and delete tours.
pub const TOUR_STAFF: &[UserRole] = &[UserRole::Admin, UserRole::LeadGuide];

/// Read the monthly plan.
pub const TOUR_GUIDES: &[UserRole] = &[UserRole::Admin, UserRole::LeadGuide, UserRole::Guide];

/// Write reviews.
pub const REVIEWERS: &[UserRole] = &[UserRole::User];

/// Delete reviews; users only their own.
pub const REVIEW_MODERATORS: &[UserRole] = &[UserRole::User, UserRole::Admin];

// ============================================================================
// Ratings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub average: f64,
    pub quantity: i32,
}

impl Default for RatingSummary {
    fn default() -> Self {
        Self {
            average: DEFAULT_RATINGS_AVERAGE,
            quantity: 0,
        }
    }
}

impl RatingSummary {
    /// From a database `AVG`/`COUNT` pair; no rows means the default.
    pub fn from_aggregate(average: Option<f64>, quantity: i64) -> Self {
        match average {
            Some(average) if quantity > 0 => Self {
                average: round_rating(average),
                quantity: i32::try_from(quantity).unwrap_or(i32::MAX),
            },
            _ => Self::default(),
        }
    }
}

/// Round to one decimal place: 4.666 -> 4.7
pub fn round_rating(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn summarize_ratings(ratings: impl IntoIterator<Item = Rating>) -> RatingSummary {
    let (sum, count) = ratings
        .into_iter()
        .fold((0i64, 0i64), |(sum, count), r| (sum + i64::from(r.value()), count + 1));

    if count == 0 {
        return RatingSummary::default();
    }
    RatingSummary::from_aggregate(Some(sum as f64 / count as f64), count)
}

// ============================================================================
// Top cheap
// ============================================================================

/// Best rated first, cheaper first among equals.
pub fn top_cheap(mut tours: Vec<Tour>, limit: usize) -> Vec<Tour> {
    tours.sort_by(|a, b| {
        b.ratings_average
            .total_cmp(&a.ratings_average)
            .then(a.price.total_cmp(&b.price))
    });
    tours.truncate(limit);
    tours
}

// ============================================================================
// Stats per difficulty
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyStats {
    pub difficulty: Difficulty,
    pub num_tours: usize,
    pub num_ratings: i64,
    pub avg_rating: f64,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}

/// Tours rated at least `min_rating`, grouped by difficulty, cheapest group first.
pub fn tour_stats(tours: &[Tour], min_rating: f64) -> Vec<DifficultyStats> {
    let mut groups: BTreeMap<Difficulty, Vec<&Tour>> = BTreeMap::new();
    for tour in tours.iter().filter(|t| t.ratings_average >= min_rating) {
        groups.entry(tour.difficulty).or_default().push(tour);
    }

    let mut stats: Vec<DifficultyStats> = groups
        .into_iter()
        .map(|(difficulty, group)| {
            let n = group.len() as f64;
            let prices = group.iter().map(|t| t.price);
            DifficultyStats {
                difficulty,
                num_tours: group.len(),
                num_ratings: group.iter().map(|t| i64::from(t.ratings_quantity)).sum(),
                avg_rating: group.iter().map(|t| t.ratings_average).sum::<f64>() / n,
                avg_price: prices.clone().sum::<f64>() / n,
                min_price: prices.clone().fold(f64::INFINITY, f64::min),
                max_price: prices.fold(f64::NEG_INFINITY, f64::max),
            }
        })
        .collect();

    stats.sort_by(|a, b| a.avg_price.total_cmp(&b.avg_price));
    stats
}

// ============================================================================
// Monthly plan
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthPlan {
    /// 1 = January
    pub month: u32,
    pub month_name: &'static str,
    pub num_tour_starts: usize,
    pub tours: Vec<String>,
}

/// Tour starts in `year` per month, busiest month first, at most `limit` months.
pub fn monthly_plan(tours: &[Tour], year: i32, limit: usize) -> Vec<MonthPlan> {
    let mut months: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for tour in tours {
        for start in tour.start_dates.iter().filter(|d| d.year() == year) {
            months
                .entry(start.month())
                .or_default()
                .push(tour.name.as_str().to_string());
        }
    }

    let mut plan: Vec<MonthPlan> = months
        .into_iter()
        .map(|(month, tours)| MonthPlan {
            month,
            month_name: u8::try_from(month)
                .ok()
                .and_then(|m| Month::try_from(m).ok())
                .map_or("", |m| m.name()),
            num_tour_starts: tours.len(),
            tours,
        })
        .collect();

    // stable sort keeps ascending months among ties
    plan.sort_by(|a, b| b.num_tour_starts.cmp(&a.num_tour_starts));
    plan.truncate(limit);
    plan
}
