//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{ReviewId, TourId, UserId};
use serde::{Deserialize, Serialize};

use crate::application::CreateReviewInput;
use crate::domain::entities::{Review, Tour, TourInput};
use crate::domain::services::{DifficultyStats, MonthPlan};
use crate::domain::value_objects::Difficulty;

// ============================================================================
// Tours
// ============================================================================

/// Body of tour create and update. Ratings are derived and not accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourRequest {
    pub name: Option<String>,
    pub duration: Option<i32>,
    pub max_group_size: Option<i32>,
    pub difficulty: Option<String>,
    pub price: Option<f64>,
    pub price_discount: Option<f64>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub image_cover: Option<String>,
    pub images: Option<Vec<String>>,
    pub start_dates: Option<Vec<DateTime<Utc>>>,
}

impl From<TourRequest> for TourInput {
    fn from(req: TourRequest) -> Self {
        Self {
            name: req.name,
            duration: req.duration,
            max_group_size: req.max_group_size,
            difficulty: req.difficulty,
            price: req.price,
            price_discount: req.price_discount,
            summary: req.summary,
            description: req.description,
            image_cover: req.image_cover,
            images: req.images,
            start_dates: req.start_dates,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourResponse {
    pub id: TourId,
    pub name: String,
    pub duration: i32,
    pub duration_weeks: f64,
    pub max_group_size: i32,
    pub difficulty: Difficulty,
    pub ratings_average: f64,
    pub ratings_quantity: i32,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_discount: Option<f64>,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image_cover: String,
    pub images: Vec<String>,
    pub start_dates: Vec<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Tour> for TourResponse {
    fn from(tour: &Tour) -> Self {
        Self {
            id: tour.id,
            name: tour.name.as_str().to_string(),
            duration: tour.duration,
            duration_weeks: f64::from(tour.duration) / 7.0,
            max_group_size: tour.max_group_size,
            difficulty: tour.difficulty,
            ratings_average: tour.ratings_average,
            ratings_quantity: tour.ratings_quantity,
            price: tour.price,
            price_discount: tour.price_discount,
            summary: tour.summary.clone(),
            description: tour.description.clone(),
            image_cover: tour.image_cover.clone(),
            images: tour.images.clone(),
            start_dates: tour.start_dates.clone(),
            created_at: tour.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TourData {
    pub tour: TourResponse,
}

impl From<&Tour> for TourData {
    fn from(tour: &Tour) -> Self {
        Self {
            tour: TourResponse::from(tour),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToursData {
    pub tours: Vec<TourResponse>,
}

impl From<&[Tour]> for ToursData {
    fn from(tours: &[Tour]) -> Self {
        Self {
            tours: tours.iter().map(TourResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsData {
    pub stats: Vec<DifficultyStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanData {
    pub plan: Vec<MonthPlan>,
}

// ============================================================================
// Reviews
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    pub review: Option<String>,
    pub rating: Option<i16>,
}

impl From<ReviewRequest> for CreateReviewInput {
    fn from(req: ReviewRequest) -> Self {
        Self {
            review: req.review,
            rating: req.rating,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: ReviewId,
    pub review: String,
    pub rating: i16,
    pub tour: TourId,
    pub user: UserId,
    pub created_at: DateTime<Utc>,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id,
            review: review.review.clone(),
            rating: review.rating.value(),
            tour: review.tour_id,
            user: review.user_id,
            created_at: review.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewData {
    pub review: ReviewResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewsData {
    pub reviews: Vec<ReviewResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tour_request_camel_case() {
        let req: TourRequest = serde_json::from_value(json!({
            "name": "The Park Camper",
            "maxGroupSize": 12,
            "priceDiscount": 100,
            "imageCover": "tour-5-cover.jpg",
            "startDates": ["2021-08-05T09:00:00Z"]
        }))
        .unwrap();

        let input = TourInput::from(req);
        assert_eq!(input.max_group_size, Some(12));
        assert_eq!(input.price_discount, Some(100.0));
        assert_eq!(input.start_dates.map(|d| d.len()), Some(1));
        assert!(input.duration.is_none());
    }

    #[test]
    fn test_tour_response_shape() {
        let tour = Tour::create(TourInput {
            name: Some("The Star Gazer".to_string()),
            duration: Some(14),
            max_group_size: Some(8),
            difficulty: Some("medium".to_string()),
            price: Some(997.0),
            summary: Some("The most remote and stunningly beautiful places".to_string()),
            image_cover: Some("tour-9-cover.jpg".to_string()),
            ..Default::default()
        })
        .unwrap();

        let value = serde_json::to_value(TourData::from(&tour)).unwrap();
        assert_eq!(value["tour"]["durationWeeks"], 2.0);
        assert_eq!(value["tour"]["difficulty"], "medium");
        assert_eq!(value["tour"]["ratingsAverage"], 4.5);
        assert!(value["tour"].get("priceDiscount").is_none());
    }
}
