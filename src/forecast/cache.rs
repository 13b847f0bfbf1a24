use chrono::{DateTime, Duration, Utc};
use ordered_float::OrderedFloat;
use std::collections::HashMap;

use crate::domain::ForecastSeries;

type LocationKey = (OrderedFloat<f64>, OrderedFloat<f64>);

fn key(latitude: f64, longitude: f64) -> LocationKey {
    (OrderedFloat(latitude), OrderedFloat(longitude))
}

/// Assembled forecasts keyed by the exact (latitude, longitude) pair
///
/// Entries live until the caller invalidates them or, when a TTL is set,
/// until they are older than the TTL.
#[derive(Debug, Clone, Default)]
pub struct ForecastCache {
    ttl: Option<Duration>,
    entries: HashMap<LocationKey, (DateTime<Utc>, ForecastSeries)>,
}

impl ForecastCache {
    /// Cache without expiry
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, latitude: f64, longitude: f64) -> Option<&ForecastSeries> {
        self.get_at(latitude, longitude, Utc::now())
    }

    /// Lookup as of `now`
    pub fn get_at(
        &self,
        latitude: f64,
        longitude: f64,
        now: DateTime<Utc>,
    ) -> Option<&ForecastSeries> {
        let (stored_at, series) = self.entries.get(&key(latitude, longitude))?;
        match self.ttl {
            Some(ttl) if now - *stored_at >= ttl => None,
            _ => Some(series),
        }
    }

    pub fn insert(&mut self, latitude: f64, longitude: f64, series: ForecastSeries) {
        self.insert_at(latitude, longitude, series, Utc::now());
    }

    pub fn insert_at(
        &mut self,
        latitude: f64,
        longitude: f64,
        series: ForecastSeries,
        stored_at: DateTime<Utc>,
    ) {
        self.entries
            .insert(key(latitude, longitude), (stored_at, series));
    }

    /// Drop the entry for one location; returns whether one existed
    pub fn invalidate(&mut self, latitude: f64, longitude: f64) -> bool {
        self.entries.remove(&key(latitude, longitude)).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
