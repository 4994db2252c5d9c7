//! Charging station records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Coordinate, Review};

/// Stable identifier of a charging station.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An approved charging station in the catalog.
///
/// Numeric fields are taken as stored. Stations loaded from disk may carry
/// a zero or negative `power_kw`; consumers that divide by it must check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: StationId,

    pub name: String,

    #[serde(default)]
    pub address: String,

    pub location: Coordinate,

    /// Maximum charging power in kilowatts.
    pub power_kw: f64,

    /// Price per kilowatt-hour delivered.
    pub cost_per_kwh: f64,

    /// Connector label as advertised by the owner (e.g. "CCS", "Tesla").
    #[serde(default)]
    pub connector: String,

    #[serde(default)]
    pub verified: bool,

    /// Mean review rating in `[0, 5]`, absent until the first review.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(default)]
    pub review_count: u32,
}

impl Station {
    /// Recompute `rating` and `review_count` from this station's reviews.
    ///
    /// The rating is the mean rounded to one decimal place. Reviews for
    /// other stations are ignored.
    pub fn apply_reviews<'a>(&mut self, reviews: impl IntoIterator<Item = &'a Review>) {
        let (sum, count) = reviews
            .into_iter()
            .filter(|r| r.station_id == self.id)
            .fold((0u32, 0u32), |(sum, count), r| {
                (sum + u32::from(r.rating), count + 1)
            });

        self.review_count = count;
        self.rating = if count == 0 {
            None
        } else {
            let mean = f64::from(sum) / f64::from(count);
            Some((mean * 10.0).round() / 10.0)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn station(id: &str) -> Station {
        Station {
            id: StationId::new(id),
            name: "Downtown Supercharger".to_string(),
            address: "1 Main St".to_string(),
            location: Coordinate::new(40.7128, -74.0060).unwrap(),
            power_kw: 150.0,
            cost_per_kwh: 0.4,
            connector: "CCS".to_string(),
            verified: true,
            rating: None,
            review_count: 0,
        }
    }

    fn review(station: &str, rating: u8) -> Review {
        Review {
            id: 1,
            station_id: StationId::new(station),
            user_id: "user-1".to_string(),
            rating,
            comment: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn station_id_display() {
        let id = StationId::new("station-42");
        assert_eq!(id.as_str(), "station-42");
        assert_eq!(id.to_string(), "station-42");
    }

    #[test]
    fn station_ids_order_lexically() {
        assert!(StationId::new("a") < StationId::new("b"));
        assert!(StationId::new("station-10") < StationId::new("station-9"));
    }

    #[test]
    fn apply_reviews_averages_and_rounds() {
        let mut s = station("s1");
        let reviews = vec![review("s1", 5), review("s1", 4), review("s1", 4)];
        s.apply_reviews(&reviews);

        assert_eq!(s.review_count, 3);
        // 13 / 3 = 4.333..
        assert_eq!(s.rating, Some(4.3));
    }

    #[test]
    fn apply_reviews_ignores_other_stations() {
        let mut s = station("s1");
        let reviews = vec![review("s1", 2), review("s2", 5)];
        s.apply_reviews(&reviews);

        assert_eq!(s.review_count, 1);
        assert_eq!(s.rating, Some(2.0));
    }

    #[test]
    fn apply_reviews_without_reviews_clears_rating() {
        let mut s = station("s1");
        s.rating = Some(3.0);
        s.review_count = 7;
        s.apply_reviews(&[]);

        assert_eq!(s.review_count, 0);
        assert_eq!(s.rating, None);
    }

    #[test]
    fn json_uses_camel_case() {
        let json = serde_json::to_value(station("s1")).unwrap();
        assert_eq!(json["powerKw"], 150.0);
        assert_eq!(json["costPerKwh"], 0.4);
        assert_eq!(json["reviewCount"], 0);
        assert!(json.get("rating").is_none());
    }

    #[test]
    fn json_defaults_optional_fields() {
        let json = r#"{
            "id": "station-1",
            "name": "Minimal",
            "location": {"latitude": 1.0, "longitude": 2.0},
            "powerKw": 50,
            "costPerKwh": 0.35
        }"#;
        let s: Station = serde_json::from_str(json).unwrap();
        assert_eq!(s.id, StationId::new("station-1"));
        assert!(!s.verified);
        assert_eq!(s.review_count, 0);
        assert!(s.connector.is_empty());
    }
}
