//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::conversions::unique_violation;
use kernel::id::{ReviewId, TourId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Review, Tour};
use crate::domain::repository::{ReviewRepository, TourRepository};
use crate::domain::services::{DEFAULT_RATINGS_AVERAGE, RatingSummary};
use crate::domain::value_objects::{Difficulty, Rating, TourName};
use crate::error::{TourError, TourResult};

const TOUR_COLUMNS: &str = r#"
    id,
    name,
    duration,
    max_group_size,
    difficulty,
    ratings_average,
    ratings_quantity,
    price,
    price_discount,
    summary,
    description,
    image_cover,
    images,
    start_dates,
    created_at
"#;

const REVIEW_COLUMNS: &str = "id, review, rating, tour_id, user_id, created_at";

/// PostgreSQL-backed tour and review repository
#[derive(Clone)]
pub struct PgTourRepository {
    pool: PgPool,
}

impl PgTourRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `tours_name_key` maps to `TourNameTaken`.
fn map_tour_write_error(err: sqlx::Error) -> TourError {
    match unique_violation(&err) {
        Some(_) => TourError::TourNameTaken,
        None => TourError::Database(err),
    }
}

/// `reviews_tour_id_user_id_key` maps to `ReviewExists`.
fn map_review_write_error(err: sqlx::Error) -> TourError {
    match unique_violation(&err) {
        Some(_) => TourError::ReviewExists,
        None => TourError::Database(err),
    }
}

impl TourRepository for PgTourRepository {
    async fn create(&self, tour: &Tour) -> TourResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tours (
                id,
                name,
                duration,
                max_group_size,
                difficulty,
                ratings_average,
                ratings_quantity,
                price,
                price_discount,
                summary,
                description,
                image_cover,
                images,
                start_dates,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(tour.id.as_uuid())
        .bind(tour.name.as_str())
        .bind(tour.duration)
        .bind(tour.max_group_size)
        .bind(tour.difficulty.as_str())
        .bind(tour.ratings_average)
        .bind(tour.ratings_quantity)
        .bind(tour.price)
        .bind(tour.price_discount)
        .bind(&tour.summary)
        .bind(tour.description.as_deref())
        .bind(&tour.image_cover)
        .bind(&tour.images)
        .bind(&tour.start_dates)
        .bind(tour.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_tour_write_error)?;

        tracing::info!(tour_id = %tour.id, name = %tour.name, "Tour created");

        Ok(())
    }

    async fn find_by_id(&self, tour_id: &TourId) -> TourResult<Option<Tour>> {
        let row = sqlx::query_as::<_, TourRow>(&format!(
            "SELECT {TOUR_COLUMNS} FROM tours WHERE id = $1"
        ))
        .bind(tour_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TourRow::into_tour).transpose()
    }

    async fn list(&self) -> TourResult<Vec<Tour>> {
        let rows = sqlx::query_as::<_, TourRow>(&format!(
            "SELECT {TOUR_COLUMNS} FROM tours ORDER BY created_at DESC, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TourRow::into_tour).collect()
    }

    async fn update(&self, tour: &Tour) -> TourResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE tours SET
                name = $2,
                duration = $3,
                max_group_size = $4,
                difficulty = $5,
                price = $6,
                price_discount = $7,
                summary = $8,
                description = $9,
                image_cover = $10,
                images = $11,
                start_dates = $12
            WHERE id = $1
            "#,
        )
        .bind(tour.id.as_uuid())
        .bind(tour.name.as_str())
        .bind(tour.duration)
        .bind(tour.max_group_size)
        .bind(tour.difficulty.as_str())
        .bind(tour.price)
        .bind(tour.price_discount)
        .bind(&tour.summary)
        .bind(tour.description.as_deref())
        .bind(&tour.image_cover)
        .bind(&tour.images)
        .bind(&tour.start_dates)
        .execute(&self.pool)
        .await
        .map_err(map_tour_write_error)?
        .rows_affected();

        if updated == 0 {
            return Err(TourError::TourNotFound);
        }

        Ok(())
    }

    async fn delete(&self, tour_id: &TourId) -> TourResult<bool> {
        // reviews go with it through ON DELETE CASCADE
        let deleted = sqlx::query("DELETE FROM tours WHERE id = $1")
            .bind(tour_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

impl ReviewRepository for PgTourRepository {
    async fn create_review(&self, review: &Review) -> TourResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reviews (id, review, rating, tour_id, user_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(review.id.as_uuid())
        .bind(&review.review)
        .bind(review.rating.value())
        .bind(review.tour_id.as_uuid())
        .bind(review.user_id.as_uuid())
        .bind(review.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_review_write_error)?;

        tracing::info!(review_id = %review.id, tour_id = %review.tour_id, "Review created");

        Ok(())
    }

    async fn find_review(&self, review_id: &ReviewId) -> TourResult<Option<Review>> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1"
        ))
        .bind(review_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ReviewRow::into_review).transpose()
    }

    async fn list_reviews(&self, tour_id: Option<&TourId>) -> TourResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS} FROM reviews
            WHERE $1::uuid IS NULL OR tour_id = $1
            ORDER BY created_at DESC, id
            "#
        ))
        .bind(tour_id.map(|id| id.into_uuid()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ReviewRow::into_review).collect()
    }

    async fn delete_review(&self, review_id: &ReviewId) -> TourResult<bool> {
        let deleted = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn refresh_ratings(&self, tour_id: &TourId) -> TourResult<Option<RatingSummary>> {
        // one statement: the aggregate and the write see the same reviews
        let row = sqlx::query_as::<_, (f64, i32)>(
            r#"
            UPDATE tours
            SET (ratings_average, ratings_quantity) = (
                SELECT COALESCE(ROUND(AVG(rating)::numeric, 1)::float8, $2), COUNT(*)::int
                FROM reviews
                WHERE tour_id = $1
            )
            WHERE id = $1
            RETURNING ratings_average, ratings_quantity
            "#,
        )
        .bind(tour_id.as_uuid())
        .bind(DEFAULT_RATINGS_AVERAGE)
        .fetch_optional(&self.pool)
        .await?;

        let summary = row.map(|(average, quantity)| RatingSummary { average, quantity });
        if let Some(summary) = summary {
            tracing::debug!(
                tour_id = %tour_id,
                average = summary.average,
                quantity = summary.quantity,
                "Tour ratings updated"
            );
        }

        Ok(summary)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct TourRow {
    id: Uuid,
    name: String,
    duration: i32,
    max_group_size: i32,
    difficulty: String,
    ratings_average: f64,
    ratings_quantity: i32,
    price: f64,
    price_discount: Option<f64>,
    summary: String,
    description: Option<String>,
    image_cover: String,
    images: Vec<String>,
    start_dates: Vec<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TourRow {
    fn into_tour(self) -> TourResult<Tour> {
        let difficulty: Difficulty = self.difficulty.parse().map_err(|_| {
            TourError::Internal(format!("Invalid difficulty in database: {}", self.difficulty))
        })?;

        Ok(Tour {
            id: TourId::from_uuid(self.id),
            name: TourName::from_db(self.name),
            duration: self.duration,
            max_group_size: self.max_group_size,
            difficulty,
            ratings_average: self.ratings_average,
            ratings_quantity: self.ratings_quantity,
            price: self.price,
            price_discount: self.price_discount,
            summary: self.summary,
            description: self.description,
            image_cover: self.image_cover,
            images: self.images,
            start_dates: self.start_dates,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    review: String,
    rating: i16,
    tour_id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

impl ReviewRow {
    fn into_review(self) -> TourResult<Review> {
        let rating = Rating::new(self.rating).map_err(|_| {
            TourError::Internal(format!("Invalid rating in database: {}", self.rating))
        })?;

        Ok(Review {
            id: ReviewId::from_uuid(self.id),
            review: self.review,
            rating,
            tour_id: TourId::from_uuid(self.tour_id),
            user_id: self.user_id.into(),
            created_at: self.created_at,
        })
    }
}
