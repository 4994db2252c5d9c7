//! Owner requests to list a new station.
//!
//! A registration is a separate record from a [`Station`]: it carries who
//! submitted it and when, and only becomes a station through
//! [`PendingRegistration::approve`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Coordinate, DomainError, Station, StationId};

/// Identifier of a pending registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationId(String);

impl RegistrationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Station details supplied by the owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDetails {
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub location: Coordinate,
    pub power_kw: f64,
    pub cost_per_kwh: f64,
    #[serde(default)]
    pub connector: String,
}

impl StationDetails {
    /// Check the fields a station needs to be usable by the planner.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidRegistration("station name is required"));
        }
        if !self.power_kw.is_finite() || self.power_kw <= 0.0 {
            return Err(DomainError::InvalidRegistration(
                "power must be a positive number of kW",
            ));
        }
        if !self.cost_per_kwh.is_finite() || self.cost_per_kwh < 0.0 {
            return Err(DomainError::InvalidRegistration(
                "cost per kWh must not be negative",
            ));
        }
        Ok(())
    }
}

/// A station listing awaiting admin approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRegistration {
    pub id: RegistrationId,
    pub owner_id: String,
    #[serde(flatten)]
    pub details: StationDetails,
    pub submitted_at: DateTime<Utc>,
}

impl PendingRegistration {
    /// Create a registration after validating the details.
    pub fn submit(
        id: RegistrationId,
        owner_id: impl Into<String>,
        details: StationDetails,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        details.validate()?;
        Ok(Self {
            id,
            owner_id: owner_id.into(),
            details,
            submitted_at,
        })
    }

    /// Convert into a verified station with no reviews yet.
    ///
    /// Details are validated again since registrations may have been edited
    /// on disk since submission.
    pub fn approve(self, station_id: StationId) -> Result<Station, DomainError> {
        self.details.validate()?;

        let StationDetails {
            name,
            address,
            location,
            power_kw,
            cost_per_kwh,
            connector,
        } = self.details;

        Ok(Station {
            id: station_id,
            name,
            address,
            location,
            power_kw,
            cost_per_kwh,
            connector,
            verified: true,
            rating: None,
            review_count: 0,
        })
    }
}
