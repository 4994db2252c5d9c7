//! The station registry.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::{
    Coordinate, PendingRegistration, RegistrationId, Review, Station, StationDetails, StationId,
};
use crate::geo;

use super::error::CatalogError;
use super::file::{CatalogData, CatalogFile};

/// Read access to the current set of approved stations.
pub trait StationCatalog: Send + Sync {
    /// An immutable snapshot of every station.
    ///
    /// Later mutations swap in a new snapshot and never touch one already
    /// handed out.
    fn all(&self) -> impl Future<Output = Arc<Vec<Station>>> + Send;

    /// Look up one station.
    fn get_by_id(&self, id: &StationId) -> impl Future<Output = Option<Station>> + Send;
}

impl<T: StationCatalog> StationCatalog for Arc<T> {
    fn all(&self) -> impl Future<Output = Arc<Vec<Station>>> + Send {
        (**self).all()
    }

    fn get_by_id(&self, id: &StationId) -> impl Future<Output = Option<Station>> + Send {
        (**self).get_by_id(id)
    }
}

#[derive(Debug, Clone, Default)]
struct Registry {
    stations: Arc<Vec<Station>>,
    pending: Vec<PendingRegistration>,
    reviews: Vec<Review>,
}

impl Registry {
    fn from_data(data: CatalogData) -> Self {
        Self {
            stations: Arc::new(data.stations),
            pending: data.pending,
            reviews: data.reviews,
        }
    }

    fn to_data(&self) -> CatalogData {
        CatalogData {
            stations: self.stations.as_ref().clone(),
            pending: self.pending.clone(),
            reviews: self.reviews.clone(),
        }
    }

    fn has_station(&self, id: &str) -> bool {
        self.stations.iter().any(|s| s.id.as_str() == id)
    }

    fn next_station_id(&self) -> StationId {
        StationId::new(next_free_id("station", self.stations.len(), |id| {
            self.has_station(id)
        }))
    }

    fn next_registration_id(&self) -> RegistrationId {
        RegistrationId::new(next_free_id("reg", self.pending.len(), |id| {
            self.pending.iter().any(|p| p.id.as_str() == id)
        }))
    }

    fn next_review_id(&self) -> u64 {
        self.reviews.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }
}

/// First `{prefix}-{n}` for `n > len` that is not taken.
fn next_free_id(prefix: &str, len: usize, taken: impl Fn(&str) -> bool) -> String {
    let mut n = len + 1;
    loop {
        let candidate = format!("{prefix}-{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Thread-safe in-memory station catalog with optional file persistence.
///
/// Every mutation builds the new registry, persists it, and only then makes
/// it visible. A failed write leaves the catalog unchanged.
#[derive(Clone)]
pub struct InMemoryCatalog {
    inner: Arc<RwLock<Registry>>,
    file: Option<CatalogFile>,
}

impl InMemoryCatalog {
    /// Create a catalog holding the given stations, without persistence.
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Registry {
                stations: Arc::new(stations),
                ..Registry::default()
            })),
            file: None,
        }
    }

    /// Create an empty catalog (for tests and fixture mode).
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Load the catalog from a file, starting empty if it doesn't exist.
    ///
    /// Subsequent mutations are written back to the same file.
    pub fn load(file: CatalogFile) -> Result<Self, CatalogError> {
        let registry = match file.load()? {
            Some(data) => Registry::from_data(data),
            None => Registry::default(),
        };

        info!(
            path = ?file.path(),
            stations = registry.stations.len(),
            pending = registry.pending.len(),
            reviews = registry.reviews.len(),
            "loaded station catalog"
        );

        Ok(Self {
            inner: Arc::new(RwLock::new(registry)),
            file: Some(file),
        })
    }

    /// Number of approved stations.
    pub async fn len(&self) -> usize {
        self.inner.read().await.stations.len()
    }

    /// Check if there are no approved stations.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.stations.is_empty()
    }

    /// Stations within `radius_miles` of `center`, nearest first.
    pub async fn nearby(&self, center: &Coordinate, radius_miles: f64) -> Vec<(Station, f64)> {
        let stations = self.all().await;
        geo::within_radius(center, &stations, radius_miles)
            .into_iter()
            .map(|(s, d)| (s.clone(), d))
            .collect()
    }

    /// Registrations awaiting approval, oldest first.
    pub async fn pending(&self) -> Vec<PendingRegistration> {
        let guard = self.inner.read().await;
        let mut pending = guard.pending.clone();
        pending.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        pending
    }

    /// Queue a station listing for approval.
    pub async fn submit_registration(
        &self,
        owner_id: &str,
        details: StationDetails,
    ) -> Result<PendingRegistration, CatalogError> {
        let mut guard = self.inner.write().await;

        let id = guard.next_registration_id();
        let registration = PendingRegistration::submit(id, owner_id, details, Utc::now())?;

        let mut next = guard.clone();
        next.pending.push(registration.clone());
        self.commit(&mut guard, next)?;

        info!(id = %registration.id, owner = owner_id, "registration submitted");
        Ok(registration)
    }

    /// Convert a pending registration into a verified station.
    pub async fn approve(&self, id: &RegistrationId) -> Result<Station, CatalogError> {
        let mut guard = self.inner.write().await;

        let mut next = guard.clone();
        let index = next
            .pending
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| CatalogError::RegistrationNotFound(id.clone()))?;
        let registration = next.pending.remove(index);

        let station = registration.approve(next.next_station_id())?;
        Arc::make_mut(&mut next.stations).push(station.clone());
        self.commit(&mut guard, next)?;

        info!(registration = %id, station = %station.id, "registration approved");
        Ok(station)
    }

    /// Remove a station and its reviews.
    pub async fn remove(&self, id: &StationId) -> Result<Station, CatalogError> {
        let mut guard = self.inner.write().await;

        let mut next = guard.clone();
        let stations = Arc::make_mut(&mut next.stations);
        let index = stations
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| CatalogError::StationNotFound(id.clone()))?;
        let removed = stations.remove(index);
        next.reviews.retain(|r| &r.station_id != id);
        self.commit(&mut guard, next)?;

        info!(station = %id, "station removed");
        Ok(removed)
    }

    /// Record a review and refresh the station's rating.
    pub async fn add_review(
        &self,
        station_id: &StationId,
        user_id: &str,
        rating: i64,
        comment: &str,
    ) -> Result<Review, CatalogError> {
        let mut guard = self.inner.write().await;

        if !guard.has_station(station_id.as_str()) {
            return Err(CatalogError::StationNotFound(station_id.clone()));
        }

        let review = Review::new(
            guard.next_review_id(),
            station_id.clone(),
            user_id,
            rating,
            comment,
            Utc::now(),
        )?;

        let mut next = guard.clone();
        next.reviews.push(review.clone());
        let Registry {
            stations, reviews, ..
        } = &mut next;
        if let Some(station) = Arc::make_mut(stations)
            .iter_mut()
            .find(|s| &s.id == station_id)
        {
            station.apply_reviews(reviews.iter());
        }
        self.commit(&mut guard, next)?;

        info!(station = %station_id, rating, "review added");
        Ok(review)
    }

    /// Reviews of one station, newest first.
    pub async fn reviews_for(&self, station_id: &StationId) -> Result<Vec<Review>, CatalogError> {
        let guard = self.inner.read().await;

        if !guard.has_station(station_id.as_str()) {
            return Err(CatalogError::StationNotFound(station_id.clone()));
        }

        let mut reviews: Vec<Review> = guard
            .reviews
            .iter()
            .filter(|r| &r.station_id == station_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(reviews)
    }

    /// Persist `next` and make it current.
    fn commit(&self, current: &mut Registry, next: Registry) -> Result<(), CatalogError> {
        if let Some(file) = &self.file {
            file.save(&next.to_data())?;
        }
        *current = next;
        Ok(())
    }
}

impl StationCatalog for InMemoryCatalog {
    async fn all(&self) -> Arc<Vec<Station>> {
        Arc::clone(&self.inner.read().await.stations)
    }

    async fn get_by_id(&self, id: &StationId) -> Option<Station> {
        let guard = self.inner.read().await;
        guard.stations.iter().find(|s| &s.id == id).cloned()
    }
}
