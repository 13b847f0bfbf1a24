use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Percentage, Temperature, WindSpeed};

/// Row labels of the NWS digital forecast table the model reads by name
pub const TEMPERATURE_F: &str = "Temperature (°F)";
pub const DEWPOINT_F: &str = "Dewpoint (°F)";
pub const SURFACE_WIND_MPH: &str = "Surface Wind (mph)";
pub const SKY_COVER_PCT: &str = "Sky Cover (%)";

/// Weather variables for one forecast hour
///
/// Every value is either numeric or missing; a cell that could not be parsed
/// is stored as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub timestamp: DateTime<Utc>,
    pub temperature_f: Option<f64>,
    pub dewpoint_f: Option<f64>,
    pub wind_speed_mph: Option<f64>,
    pub sky_cover_pct: Option<f64>,
    /// Remaining raw fields (wind chill, gust, humidity, precipitation, ...)
    pub other: BTreeMap<String, Option<f64>>,
}

impl ForecastRecord {
    /// Build a record from named numeric fields, routing the known labels
    /// into their typed slots
    pub fn from_fields(
        timestamp: DateTime<Utc>,
        fields: impl IntoIterator<Item = (String, Option<f64>)>,
    ) -> Self {
        let mut record = Self {
            timestamp,
            temperature_f: None,
            dewpoint_f: None,
            wind_speed_mph: None,
            sky_cover_pct: None,
            other: BTreeMap::new(),
        };
        for (name, value) in fields {
            match name.as_str() {
                TEMPERATURE_F => record.temperature_f = value,
                DEWPOINT_F => record.dewpoint_f = value,
                SURFACE_WIND_MPH => record.wind_speed_mph = value,
                SKY_COVER_PCT => record.sky_cover_pct = value,
                _ => {
                    record.other.insert(name, value);
                }
            }
        }
        record
    }

    pub fn air_temperature(&self) -> Option<Temperature> {
        self.temperature_f.map(Temperature::fahrenheit)
    }

    pub fn dewpoint(&self) -> Option<Temperature> {
        self.dewpoint_f.map(Temperature::fahrenheit)
    }

    pub fn wind_speed(&self) -> Option<WindSpeed> {
        self.wind_speed_mph.map(WindSpeed::mph)
    }

    pub fn sky_cover(&self) -> Option<Percentage> {
        self.sky_cover_pct.map(Percentage::new)
    }

    pub fn field(&self, name: &str) -> Option<f64> {
        match name {
            TEMPERATURE_F => self.temperature_f,
            DEWPOINT_F => self.dewpoint_f,
            SURFACE_WIND_MPH => self.wind_speed_mph,
            SKY_COVER_PCT => self.sky_cover_pct,
            _ => self.other.get(name).copied().flatten(),
        }
    }
}

/// Hourly forecast for one location, ascending and free of duplicate hours
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSeries {
    #[serde(serialize_with = "serialize_zone")]
    zone: Tz,
    records: Vec<ForecastRecord>,
}

fn serialize_zone<S: serde::Serializer>(zone: &Tz, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(zone.name())
}

impl ForecastSeries {
    /// Create a series from records in priority order.
    ///
    /// When two records share a timestamp the one that comes first wins,
    /// so callers pass earlier-issued forecasts first. The result is sorted.
    pub fn new(zone: Tz, records: Vec<ForecastRecord>) -> Self {
        let mut records: Vec<ForecastRecord> = records
            .into_iter()
            .unique_by(|r| r.timestamp)
            .collect();
        records.sort_by_key(|r| r.timestamp);
        Self { zone, records }
    }

    /// Fixed-offset zone the forecast was issued in
    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.records.iter().map(|r| r.timestamp).collect()
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.records.first().map(|r| r.timestamp)
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.records.last().map(|r| r.timestamp)
    }

    /// Consecutive timestamp pairs that are further apart than one hour
    pub fn gaps(&self) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        self.records
            .iter()
            .tuple_windows()
            .filter(|(a, b)| b.timestamp - a.timestamp > Duration::hours(1))
            .map(|(a, b)| (a.timestamp, b.timestamp))
            .collect()
    }
}
