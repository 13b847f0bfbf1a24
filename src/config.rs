use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use validator::Validate;

use crate::domain::{GeoLocation, WaterTemperature};
use crate::error::{Error, Result};
use crate::flux::{FluxParameters, WindFunction};
use crate::forecast::{nws, DEFAULT_LEAD_HOURS};
use crate::{elevation, flux::physics};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "WHF__";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub location: LocationConfig,
    #[validate(nested)]
    pub water: WaterConfig,
    #[validate(nested)]
    pub forecast: ForecastConfig,
    #[validate(nested)]
    pub elevation: ElevationConfig,
    #[validate(nested)]
    pub flux: FluxConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LocationConfig {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    pub name: Option<String>,
}

impl LocationConfig {
    pub fn geo_location(&self) -> GeoLocation {
        GeoLocation {
            latitude: self.latitude,
            longitude: self.longitude,
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WaterConfig {
    #[validate(range(min = -5.0, max = 45.0))]
    pub temperature_c: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub depth_m: f64,
}

impl WaterConfig {
    pub fn temperature(&self) -> WaterTemperature {
        WaterTemperature::Constant(self.temperature_c)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForecastConfig {
    #[validate(url)]
    pub base_url: String,
    #[validate(length(min = 1))]
    pub lead_hours: Vec<u32>,
    #[validate(range(min = 1))]
    pub http_timeout_seconds: u64,
    /// 0 keeps cached forecasts until invalidated
    pub cache_ttl_seconds: u64,
}

impl ForecastConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    pub fn cache_ttl(&self) -> Option<chrono::Duration> {
        (self.cache_ttl_seconds > 0)
            .then(|| chrono::Duration::seconds(self.cache_ttl_seconds as i64))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ElevationConfig {
    #[validate(url)]
    pub base_url: String,
    #[validate(length(min = 1))]
    pub dataset: String,
    #[validate(range(min = 1))]
    pub http_timeout_seconds: u64,
}

impl ElevationConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}

/// Site calibration of the flux model
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FluxConfig {
    #[validate(range(min = 0.0, max = 1.0))]
    pub reflectivity: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub pressure_mb: f64,
    pub wind_a: f64,
    pub wind_b: f64,
    pub wind_c: f64,
    pub wind_r: f64,
}

impl FluxConfig {
    pub fn parameters(&self) -> FluxParameters {
        FluxParameters {
            reflectivity: self.reflectivity,
            pressure_mb: self.pressure_mb,
            wind: WindFunction {
                a: self.wind_a,
                b: self.wind_b,
                c: self.wind_c,
                r: self.wind_r,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let wind = WindFunction::default();
        Self {
            location: LocationConfig {
                latitude: 39.7392,
                longitude: -104.9903,
                name: None,
            },
            water: WaterConfig {
                temperature_c: 4.0,
                depth_m: 1.0,
            },
            forecast: ForecastConfig {
                base_url: nws::DEFAULT_BASE_URL.to_string(),
                lead_hours: DEFAULT_LEAD_HOURS.to_vec(),
                http_timeout_seconds: 30,
                cache_ttl_seconds: 0,
            },
            elevation: ElevationConfig {
                base_url: elevation::DEFAULT_BASE_URL.to_string(),
                dataset: elevation::DEFAULT_DATASET.to_string(),
                http_timeout_seconds: 30,
            },
            flux: FluxConfig {
                reflectivity: physics::DEFAULT_REFLECTIVITY,
                pressure_mb: physics::DEFAULT_PRESSURE_MB,
                wind_a: wind.a,
                wind_b: wind.b,
                wind_c: wind.c,
                wind_r: wind.r,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment(DEFAULT_CONFIG_PATH))
    }

    /// Built-in defaults, then the TOML file, then `WHF__` environment variables
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.forecast.lead_hours, vec![0, 48, 96, 107]);
        assert_eq!(config.flux.parameters(), FluxParameters::default());
        assert_eq!(config.forecast.cache_ttl(), None);
    }

    #[test]
    fn test_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "site.toml",
                r#"
                [location]
                latitude = 44.98
                longitude = -93.27
                name = "Lake Harriet"

                [water]
                temperature_c = 12.5
                depth_m = 2.0
                "#,
            )?;
            jail.set_env("WHF__WATER__DEPTH_M", "3.5");
            jail.set_env("WHF__FLUX__REFLECTIVITY", "0.08");

            let config = Config::from_figment(Config::figment("site.toml")).unwrap();
            assert_eq!(config.location.name.as_deref(), Some("Lake Harriet"));
            assert_eq!(config.water.temperature_c, 12.5);
            assert_eq!(config.water.depth_m, 3.5);
            assert_eq!(config.flux.reflectivity, 0.08);
            assert_eq!(config.elevation.dataset, "ned10m");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("WHF__WATER__DEPTH_M", "0");
            let err = Config::from_figment(Config::figment("missing.toml")).unwrap_err();
            assert!(matches!(err, Error::InvalidConfig(_)));

            jail.set_env("WHF__WATER__DEPTH_M", "1");
            jail.set_env("WHF__LOCATION__LATITUDE", "123");
            let err = Config::from_figment(Config::figment("missing.toml")).unwrap_err();
            assert!(matches!(err, Error::InvalidConfig(_)));
            Ok(())
        });
    }

    #[test]
    fn test_cache_ttl() {
        let mut forecast = Config::default().forecast;
        forecast.cache_ttl_seconds = 900;
        assert_eq!(forecast.cache_ttl(), Some(chrono::Duration::minutes(15)));
    }
}
