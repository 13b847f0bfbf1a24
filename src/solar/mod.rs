//! # Solar Input
//!
//! Evaluates the clear-sky model over an hourly timestamp range so the
//! result can be aligned one-to-one with a forecast series.

pub mod clear_sky;

pub use clear_sky::ClearSkyModel;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::debug;

use crate::domain::{ClearSkyPoint, ClearSkySeries, Location};

/// Hourly timestamps from `start` to `end` inclusive, expressed in `zone`
pub fn hourly_range<Z: TimeZone>(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    zone: &Z,
) -> Vec<DateTime<Z>> {
    let mut range = Vec::new();
    let mut current = start;
    while current <= end {
        range.push(current.with_timezone(zone));
        current += Duration::hours(1);
    }
    range
}

/// Clear-sky GHI at each timestamp for the given site
pub fn clear_sky_series<Z: TimeZone>(
    location: &Location,
    timestamps: &[DateTime<Z>],
) -> ClearSkySeries {
    let model = ClearSkyModel::new(
        location.latitude(),
        location.longitude(),
        location.elevation_m(),
    );
    let points: Vec<ClearSkyPoint> = timestamps
        .iter()
        .map(|ts| ClearSkyPoint {
            timestamp: ts.with_timezone(&Utc),
            ghi_w_m2: model.clear_sky_irradiance(ts),
        })
        .collect();
    debug!(site = location.name(), points = points.len(), "computed clear-sky series");
    ClearSkySeries::new(points)
}
