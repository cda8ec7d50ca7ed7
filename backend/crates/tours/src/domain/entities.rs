//! Domain Entities

use chrono::{DateTime, Utc};
use kernel::id::{ReviewId, TourId, UserId};
use kernel::validation::FieldErrors;
use std::fmt::Display;

use crate::domain::services::{DEFAULT_RATINGS_AVERAGE, RatingSummary};
use crate::domain::value_objects::{Difficulty, Rating, TourName};

// ============================================================================
// Tour
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    pub id: TourId,
    pub name: TourName,
    /// Days
    pub duration: i32,
    pub max_group_size: i32,
    pub difficulty: Difficulty,
    /// Derived from reviews; 4.5 until the first one
    pub ratings_average: f64,
    pub ratings_quantity: i32,
    pub price: f64,
    /// Always below `price`
    pub price_discount: Option<f64>,
    pub summary: String,
    pub description: Option<String>,
    pub image_cover: String,
    pub images: Vec<String>,
    pub start_dates: Vec<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Client-supplied tour fields. On create the required ones must be
/// present; on update `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TourInput {
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

impl Tour {
    /// Validate a new tour. All invalid fields are reported together.
    pub fn create(input: TourInput) -> Result<Self, FieldErrors> {
        build(None, input)
    }

    /// Validate `changes` against the current state and apply them.
    /// On error `self` is unchanged.
    pub fn apply(&mut self, changes: TourInput) -> Result<(), FieldErrors> {
        *self = build(Some(&*self), changes)?;
        Ok(())
    }

    pub fn set_ratings(&mut self, summary: RatingSummary) {
        self.ratings_average = summary.average;
        self.ratings_quantity = summary.quantity;
    }
}

/// Take `raw` through `parse` when given, else keep `current`; a missing
/// value with nothing to keep is an error.
fn resolve<R, T, E: Display>(
    errors: &mut FieldErrors,
    field: &'static str,
    raw: Option<R>,
    current: Option<T>,
    parse: impl FnOnce(R) -> Result<T, E>,
) -> Option<T> {
    match (raw, current) {
        (Some(raw), _) => errors.check(field, parse(raw)),
        (None, Some(current)) => Some(current),
        (None, None) => {
            errors.push(field, format!("A tour must have a {field}"));
            None
        }
    }
}

fn positive_i32(field: &'static str) -> impl FnOnce(i32) -> Result<i32, String> {
    move |value| {
        if value > 0 {
            Ok(value)
        } else {
            Err(format!("{field} must be greater than 0"))
        }
    }
}

fn non_empty(field: &'static str) -> impl FnOnce(String) -> Result<String, String> {
    move |value| {
        let value = value.trim().to_string();
        if value.is_empty() {
            Err(format!("A tour must have a {field}"))
        } else {
            Ok(value)
        }
    }
}

fn build(base: Option<&Tour>, input: TourInput) -> Result<Tour, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = resolve(
        &mut errors,
        "name",
        input.name,
        base.map(|t| t.name.clone()),
        |raw: String| TourName::new(raw),
    );
    let duration = resolve(
        &mut errors,
        "duration",
        input.duration,
        base.map(|t| t.duration),
        positive_i32("duration"),
    );
    let max_group_size = resolve(
        &mut errors,
        "maxGroupSize",
        input.max_group_size,
        base.map(|t| t.max_group_size),
        positive_i32("maxGroupSize"),
    );
    let difficulty = resolve(
        &mut errors,
        "difficulty",
        input.difficulty,
        base.map(|t| t.difficulty),
        |raw: String| raw.parse::<Difficulty>(),
    );
    let price = resolve(&mut errors, "price", input.price, base.map(|t| t.price), |value: f64| {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err("price must be greater than 0")
        }
    });
    let summary = resolve(
        &mut errors,
        "summary",
        input.summary,
        base.map(|t| t.summary.clone()),
        non_empty("summary"),
    );
    let image_cover = resolve(
        &mut errors,
        "imageCover",
        input.image_cover,
        base.map(|t| t.image_cover.clone()),
        non_empty("imageCover"),
    );

    let price_discount = input
        .price_discount
        .or_else(|| base.and_then(|t| t.price_discount));
    if let (Some(discount), Some(price)) = (price_discount, price) {
        if !discount.is_finite() || discount < 0.0 || discount >= price {
            errors.push(
                "priceDiscount",
                format!("Discount price ({discount}) should be below regular price"),
            );
        }
    }

    errors.finish()?;

    let (
        Some(name),
        Some(duration),
        Some(max_group_size),
        Some(difficulty),
        Some(price),
        Some(summary),
        Some(image_cover),
    ) = (name, duration, max_group_size, difficulty, price, summary, image_cover)
    else {
        // every None above pushed an error
        return Err(FieldErrors::new());
    };

    Ok(Tour {
        id: base.map(|t| t.id).unwrap_or_default(),
        name,
        duration,
        max_group_size,
        difficulty,
        ratings_average: base.map_or(DEFAULT_RATINGS_AVERAGE, |t| t.ratings_average),
        ratings_quantity: base.map_or(0, |t| t.ratings_quantity),
        price,
        price_discount,
        summary,
        description: input
            .description
            .or_else(|| base.and_then(|t| t.description.clone())),
        image_cover,
        images: input
            .images
            .or_else(|| base.map(|t| t.images.clone()))
            .unwrap_or_default(),
        start_dates: input
            .start_dates
            .or_else(|| base.map(|t| t.start_dates.clone()))
            .unwrap_or_default(),
        created_at: base.map_or_else(Utc::now, |t| t.created_at),
    })
}

// ============================================================================
// Review
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub review: String,
    pub rating: Rating,
    pub tour_id: TourId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(
        tour_id: TourId,
        user_id: UserId,
        review: Option<String>,
        rating: Option<i16>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let review = review.map(|r| r.trim().to_string()).unwrap_or_default();
        if review.is_empty() {
            errors.push("review", "Review can not be empty");
        }
        let rating = match rating {
            Some(value) => errors.check("rating", Rating::new(value)),
            None => {
                errors.push("rating", "A review must have a rating");
                None
            }
        };
        errors.finish()?;

        let Some(rating) = rating else {
            return Err(FieldErrors::new());
        };

        Ok(Self {
            id: ReviewId::new(),
            review,
            rating,
            tour_id,
            user_id,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn forest_hiker() -> TourInput {
        TourInput {
            name: Some("The Forest Hiker".to_string()),
            duration: Some(5),
            max_group_size: Some(25),
            difficulty: Some("easy".to_string()),
            price: Some(397.0),
            summary: Some("Breathtaking hike through the Canadian Banff National Park".to_string()),
            image_cover: Some("tour-1-cover.jpg".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_tour_defaults() {
        let tour = Tour::create(forest_hiker()).unwrap();

        assert_eq!(tour.ratings_average, 4.5);
        assert_eq!(tour.ratings_quantity, 0);
        assert!(tour.images.is_empty());
        assert!(tour.price_discount.is_none());
    }

    #[test]
    fn test_create_tour_reports_missing_fields() {
        let errors = Tour::create(TourInput::default()).unwrap_err();
        for field in ["name", "duration", "maxGroupSize", "difficulty", "price", "summary", "imageCover"] {
            assert!(errors.contains_field(field), "{field}");
        }
    }

    #[test]
    fn test_discount_must_be_below_price() {
        let input = TourInput {
            price_discount: Some(397.0),
            ..forest_hiker()
        };
        assert!(Tour::create(input).unwrap_err().contains_field("priceDiscount"));

        let input = TourInput {
            price_discount: Some(100.0),
            ..forest_hiker()
        };
        assert_eq!(Tour::create(input).unwrap().price_discount, Some(100.0));
    }

    #[test]
    fn test_apply_checks_discount_against_new_price() {
        let mut tour = Tour::create(TourInput {
            price_discount: Some(100.0),
            ..forest_hiker()
        })
        .unwrap();
        let before = tour.clone();

        let errors = tour
            .apply(TourInput {
                price: Some(50.0),
                ..Default::default()
            })
            .unwrap_err();

        assert!(errors.contains_field("priceDiscount"));
        assert_eq!(tour, before);
    }

    #[test]
    fn test_apply_keeps_identity() {
        let mut tour = Tour::create(forest_hiker()).unwrap();
        let id = tour.id;

        tour.apply(TourInput {
            difficulty: Some("medium".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(tour.id, id);
        assert_eq!(tour.difficulty, Difficulty::Medium);
        assert_eq!(tour.name.as_str(), "The Forest Hiker");
    }

    #[test]
    fn test_review_validation() {
        let errors = Review::new(TourId::new(), UserId::new(), Some("  ".into()), Some(9)).unwrap_err();
        assert!(errors.contains_field("review"));
        assert!(errors.contains_field("rating"));

        let review = Review::new(TourId::new(), UserId::new(), Some("Great!".into()), Some(5)).unwrap();
        assert_eq!(review.rating.value(), 5);
    }
}
