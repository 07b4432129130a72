//! Tunable validation limits shared by the domain validators.

/// Default minimum password length in characters.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;
/// Default lowest accepted event rating.
pub const DEFAULT_MIN_EVENT_RATING: f64 = 0.0;
/// Default highest accepted event rating.
pub const DEFAULT_MAX_EVENT_RATING: f64 = 10.0;

/// Inclusive bounds for assistance ratings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingRange {
    min: f64,
    max: f64,
}

/// Rejected rating bounds.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("rating range is empty: min {min} exceeds max {max}")]
pub struct RatingRangeError {
    /// Requested lower bound.
    pub min: f64,
    /// Requested upper bound.
    pub max: f64,
}

impl RatingRange {
    /// Build a range, rejecting `min > max` and non-finite bounds.
    pub fn new(min: f64, max: f64) -> Result<Self, RatingRangeError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(RatingRangeError { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Whether `rating` lies within the inclusive bounds.
    pub fn contains(&self, rating: f64) -> bool {
        rating >= self.min && rating <= self.max
    }
}

impl Default for RatingRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_EVENT_RATING,
            max: DEFAULT_MAX_EVENT_RATING,
        }
    }
}

/// Limits consulted by field validators.
///
/// Built once from configuration at start-up and handed to services by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationRules {
    min_password_length: usize,
    rating: RatingRange,
}

impl ValidationRules {
    /// Construct rules from explicit limits.
    pub fn new(min_password_length: usize, rating: RatingRange) -> Self {
        Self {
            min_password_length,
            rating,
        }
    }

    /// Minimum password length in characters.
    pub fn min_password_length(&self) -> usize {
        self.min_password_length
    }

    /// Accepted rating bounds.
    pub fn rating(&self) -> RatingRange {
        self.rating
    }
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PASSWORD_LENGTH, RatingRange::default())
    }
}
