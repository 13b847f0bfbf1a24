use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearSkyPoint {
    pub timestamp: DateTime<Utc>,
    /// Global horizontal irradiance in W/m²
    pub ghi_w_m2: f64,
}

/// Clear-sky irradiance keyed by timestamp
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClearSkySeries {
    points: Vec<ClearSkyPoint>,
}

impl ClearSkySeries {
    pub fn new(points: Vec<ClearSkyPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[ClearSkyPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    pub fn ghi_at(&self, timestamp: DateTime<Utc>) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.timestamp == timestamp)
            .map(|p| p.ghi_w_m2)
    }

    /// Select the values at exactly the given timestamps, in that order.
    ///
    /// Fails with `MisalignedSeries` when any timestamp has no irradiance value.
    pub fn aligned_to(&self, timestamps: &[DateTime<Utc>]) -> Result<Self> {
        let by_time: HashMap<DateTime<Utc>, f64> = self
            .points
            .iter()
            .map(|p| (p.timestamp, p.ghi_w_m2))
            .collect();

        let points = timestamps
            .iter()
            .map(|ts| {
                by_time
                    .get(ts)
                    .map(|ghi| ClearSkyPoint {
                        timestamp: *ts,
                        ghi_w_m2: *ghi,
                    })
                    .ok_or_else(|| {
                        Error::misaligned(
                            format!("clear-sky value at {}", ts.to_rfc3339()),
                            "no value",
                        )
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { points })
    }
}
