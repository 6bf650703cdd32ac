// src/models/review.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Place;

/// Rating value meaning "not chosen yet"; never persisted
pub const UNSET_RATING: u8 = 0;

/// Local user review of a place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Star rating, 1-5
    pub rating: u8,
    /// Free-text comment, may be empty
    #[serde(default)]
    pub comment: String,
}

/// Request to add a review to a place
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub address: String,

    /// 0 leaves the place untouched
    #[validate(range(max = 5))]
    pub rating: u8,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub comment: String,
}

/// Query string for GET /reviews
#[derive(Debug, Deserialize)]
pub struct ReviewQuery {
    pub name: String,
    #[serde(default)]
    pub address: String,
}

/// Reviews of one place with their mean rating
#[derive(Debug, Clone, Serialize)]
pub struct ReviewSummaryResponse {
    /// Derived place identity
    pub id: String,
    pub reviews: Vec<Review>,
    pub average: f64,
    pub count: usize,
}

impl CreateReviewRequest {
    /// Key-only place the review is attached to
    pub fn place(&self) -> Place {
        Place::new(&self.name, &self.address)
    }
}

impl ReviewQuery {
    pub fn place(&self) -> Place {
        Place::new(&self.name, &self.address)
    }
}
