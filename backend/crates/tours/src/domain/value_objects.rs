//! Domain Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Difficulty
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Difficult,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Difficulty is either: easy, medium, difficult")]
pub struct UnknownDifficulty;

impl Difficulty {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Difficult => "difficult",
        }
    }
}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "difficult" => Ok(Difficulty::Difficult),
            _ => Err(UnknownDifficulty),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tour Name
// ============================================================================

pub const TOUR_NAME_MIN_LENGTH: usize = 10;
pub const TOUR_NAME_MAX_LENGTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourNameError {
    #[error("A tour must have a name")]
    Empty,

    #[error("A tour name must have at least {} characters", TOUR_NAME_MIN_LENGTH)]
    TooShort,

    #[error("A tour name must have at most {} characters", TOUR_NAME_MAX_LENGTH)]
    TooLong,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TourName(String);

impl TourName {
    /// Trims before checking the length.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TourNameError> {
        let name = raw.as_ref().trim();
        let len = name.chars().count();

        if len == 0 {
            return Err(TourNameError::Empty);
        }
        if len < TOUR_NAME_MIN_LENGTH {
            return Err(TourNameError::TooShort);
        }
        if len > TOUR_NAME_MAX_LENGTH {
            return Err(TourNameError::TooLong);
        }

        Ok(Self(name.to_string()))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TourName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Rating
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Rating must be between 1 and 5")]
pub struct RatingOutOfRange;

/// A review score, 1 to 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(i16);

impl Rating {
    pub const MIN: i16 = 1;
    pub const MAX: i16 = 5;

    pub fn new(value: i16) -> Result<Self, RatingOutOfRange> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingOutOfRange)
        }
    }

    pub fn value(&self) -> i16 {
        self.0
    }
}
