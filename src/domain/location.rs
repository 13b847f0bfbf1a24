use serde::{Deserialize, Serialize};

/// Geographic point as requested by the caller, before elevation is known
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub name: Option<String>,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Site with a resolved elevation. Immutable once obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    latitude: f64,
    longitude: f64,
    elevation_m: f64,
    name: String,
}

impl Location {
    pub fn new(geo: &GeoLocation, elevation_m: f64) -> Self {
        Self {
            latitude: geo.latitude,
            longitude: geo.longitude,
            elevation_m,
            name: geo
                .name
                .clone()
                .unwrap_or_else(|| "general location".to_string()),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn elevation_m(&self) -> f64 {
        self.elevation_m
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
