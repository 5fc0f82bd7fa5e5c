use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shared_models::numeric::{lenient_i64, round2, value_as_i64};
use shared_models::record::RecordId;

pub const REVIEWS_TABLE: &str = "reviews";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: RecordId,
    #[serde(default)]
    pub booking_id: Option<Value>,
    #[serde(default)]
    pub doctor_id: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewRatingRow {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub rating: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_reviews: usize,
    pub average_rating: f64,
    /// Keys "1" through "5".
    pub rating_distribution: BTreeMap<String, usize>,
}

impl ReviewStats {
    pub fn from_rows(rows: &[ReviewRatingRow]) -> Self {
        let mut rating_distribution: BTreeMap<String, usize> =
            (1..=5).map(|star| (star.to_string(), 0)).collect();

        let ratings: Vec<i64> = rows.iter().filter_map(|r| r.rating).collect();
        for rating in &ratings {
            if let Some(slot) = rating_distribution.get_mut(&rating.to_string()) {
                *slot += 1;
            }
        }

        let average_rating = if ratings.is_empty() {
            0.0
        } else {
            round2(ratings.iter().sum::<i64>() as f64 / ratings.len() as f64)
        };

        Self {
            total_reviews: rows.len(),
            average_rating,
            rating_distribution,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("Review not found")]
    NotFound,

    #[error("Rating must be between 1 and 5")]
    InvalidRating,
}

/// `rating`, when supplied, must be an integer from 1 to 5.
pub fn validate_review_payload(payload: &Map<String, Value>) -> Result<(), ReviewError> {
    match payload.get("rating") {
        None | Some(Value::Null) => Ok(()),
        Some(value) => match value_as_i64(value) {
            Some(rating) if (1..=5).contains(&rating) => Ok(()),
            _ => Err(ReviewError::InvalidRating),
        },
    }
}
