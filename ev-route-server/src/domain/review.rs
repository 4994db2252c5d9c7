//! Station reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DomainError, StationId};

/// A user's rating of a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: u64,
    pub station_id: StationId,
    pub user_id: String,
    /// Star rating, always within `1..=5`.
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Create a review, rejecting ratings outside `1..=5`.
    pub fn new(
        id: u64,
        station_id: StationId,
        user_id: impl Into<String>,
        rating: i64,
        comment: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let rating = u8::try_from(rating)
            .ok()
            .filter(|r| (1..=5).contains(r))
            .ok_or(DomainError::InvalidRating(rating))?;

        Ok(Self {
            id,
            station_id,
            user_id: user_id.into(),
            rating,
            comment: comment.into(),
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_one_to_five() {
        for rating in 1..=5 {
            let r = Review::new(1, StationId::new("s"), "u", rating, "", Utc::now()).unwrap();
            assert_eq!(i64::from(r.rating), rating);
        }
    }

    #[test]
    fn rejects_out_of_range() {
        for rating in [-1, 0, 6, 300] {
            let err = Review::new(1, StationId::new("s"), "u", rating, "", Utc::now()).unwrap_err();
            assert!(matches!(err, DomainError::InvalidRating(r) if r == rating));
        }
    }
}
