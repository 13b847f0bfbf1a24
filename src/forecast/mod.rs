//! # Forecast Assembly
//!
//! Fetches several overlapping forecast windows for a location and merges
//! them into one deduplicated, ascending, UTC-anchored hourly series.

pub mod assembly;
pub mod cache;
pub mod nws;
pub mod timezone;

pub use assembly::*;
pub use cache::*;
pub use nws::NwsClient;
pub use timezone::*;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::domain::ForecastSeries;
use crate::error::Result;

/// Lead times of the windows that together cover the full forecast horizon
pub const DEFAULT_LEAD_HOURS: [u32; 4] = [0, 48, 96, 107];

/// Source of raw forecast windows
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Fetch the window that starts `lead_hours` after the current hour
    async fn fetch_window(
        &self,
        latitude: f64,
        longitude: f64,
        lead_hours: u32,
    ) -> Result<RawForecastWindow>;
}

/// Fetches the lead-time windows one after another and merges them
pub struct ForecastAssembler<S: ForecastSource> {
    source: S,
    lead_hours: Vec<u32>,
    cache: ForecastCache,
}

impl<S: ForecastSource> ForecastAssembler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            lead_hours: DEFAULT_LEAD_HOURS.to_vec(),
            cache: ForecastCache::new(),
        }
    }

    pub fn with_lead_hours(mut self, lead_hours: Vec<u32>) -> Self {
        self.lead_hours = lead_hours;
        self
    }

    pub fn with_cache(mut self, cache: ForecastCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &ForecastCache {
        &self.cache
    }

    /// Cache access for caller-driven invalidation
    pub fn cache_mut(&mut self) -> &mut ForecastCache {
        &mut self.cache
    }

    /// Full forecast horizon for a location.
    ///
    /// Any window that fails to fetch or parse aborts the whole assembly;
    /// a series is never built from a subset of the windows.
    pub async fn full_forecast(&mut self, latitude: f64, longitude: f64) -> Result<ForecastSeries> {
        if let Some(cached) = self.cache.get(latitude, longitude) {
            debug!(latitude, longitude, "forecast served from cache");
            return Ok(cached.clone());
        }

        let mut windows = Vec::with_capacity(self.lead_hours.len());
        for &lead_hours in &self.lead_hours {
            let window = self
                .source
                .fetch_window(latitude, longitude, lead_hours)
                .await
                .inspect_err(|e| {
                    error!(lead_hours, error = %e, "forecast window failed, aborting assembly");
                })?;
            windows.push(window);
        }

        let series = merge_windows(&windows)?;
        for (before, after) in series.gaps() {
            warn!(%before, %after, "assembled forecast has a gap");
        }
        info!(
            latitude,
            longitude,
            hours = series.len(),
            windows = windows.len(),
            "assembled forecast"
        );

        self.cache.insert(latitude, longitude, series.clone());
        Ok(series)
    }
}
