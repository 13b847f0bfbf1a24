//! # Clear-Sky Radiation
//!
//! Solar position from UTC time and an elevation-aware clear-sky
//! irradiance estimate. Cloud attenuation is applied later by the flux
//! model, so everything here assumes a cloudless sky.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use std::f64::consts::PI;

const DEG: f64 = PI / 180.0;

/// Solar constant at mean Earth-Sun distance (W/m²)
pub const SOLAR_CONSTANT: f64 = 1361.0;

/// Diffuse contribution on top of the direct beam
const DIFFUSE_FACTOR: f64 = 1.1;

/// Clear-sky solar radiation model for one site
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearSkyModel {
    latitude_deg: f64,
    longitude_deg: f64,
    elevation_m: f64,
}

/// Fractional-year angle used by the Spencer series (radians)
fn day_angle(time: DateTime<Utc>) -> f64 {
    2.0 * PI * (time.ordinal() as f64 - 1.0) / 365.0
}

/// Solar declination (radians), Spencer 1971
fn declination(b: f64) -> f64 {
    0.006918 - 0.399912 * b.cos() + 0.070257 * b.sin() - 0.006758 * (2.0 * b).cos()
        + 0.000907 * (2.0 * b).sin()
        - 0.002697 * (3.0 * b).cos()
        + 0.00148 * (3.0 * b).sin()
}

/// Equation of time (minutes), Spencer 1971
fn equation_of_time(b: f64) -> f64 {
    229.18
        * (0.000075 + 0.001868 * b.cos()
            - 0.032077 * b.sin()
            - 0.014615 * (2.0 * b).cos()
            - 0.04089 * (2.0 * b).sin())
}

/// Top-of-atmosphere irradiance corrected for orbital eccentricity (W/m²)
fn extraterrestrial_irradiance(b: f64) -> f64 {
    SOLAR_CONSTANT
        * (1.00011
            + 0.034221 * b.cos()
            + 0.00128 * b.sin()
            + 0.000719 * (2.0 * b).cos()
            + 0.000077 * (2.0 * b).sin())
}

impl ClearSkyModel {
    pub fn new(latitude_deg: f64, longitude_deg: f64, elevation_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            elevation_m,
        }
    }

    /// Calculate solar position (elevation and azimuth) for given time
    ///
    /// Returns: (elevation_deg, azimuth_deg)
    /// Elevation: angle above horizon (0 = horizon, 90 = directly overhead)
    /// Azimuth: angle from north (0 = north, 90 = east, 180 = south, 270 = west)
    pub fn solar_position<Z: TimeZone>(&self, time: &DateTime<Z>) -> (f64, f64) {
        let utc = time.with_timezone(&Utc);
        let b = day_angle(utc);
        let declination_rad = declination(b);
        let latitude_rad = self.latitude_deg * DEG;

        let ut_hours =
            utc.hour() as f64 + utc.minute() as f64 / 60.0 + utc.second() as f64 / 3600.0;
        let solar_time = ut_hours + self.longitude_deg / 15.0 + equation_of_time(b) / 60.0;
        // Normalised to (-180, 180]; negative before solar noon
        let hour_angle_deg = (15.0 * (solar_time - 12.0) + 180.0).rem_euclid(360.0) - 180.0;
        let hour_angle_rad = hour_angle_deg * DEG;

        let elevation_sin = latitude_rad.sin() * declination_rad.sin()
            + latitude_rad.cos() * declination_rad.cos() * hour_angle_rad.cos();
        let elevation_rad = elevation_sin.clamp(-1.0, 1.0).asin();

        let denominator = latitude_rad.cos() * elevation_rad.cos();
        let azimuth_cos = if denominator.abs() > 1e-9 {
            (declination_rad.sin() - latitude_rad.sin() * elevation_sin) / denominator
        } else {
            0.0
        };
        let mut azimuth_deg = azimuth_cos.clamp(-1.0, 1.0).acos() / DEG;

        // Afternoon: sun in the western sky
        if hour_angle_deg > 0.0 {
            azimuth_deg = 360.0 - azimuth_deg;
        }

        (elevation_rad / DEG, azimuth_deg)
    }

    /// Relative optical air mass, Kasten & Young (1989)
    pub fn air_mass(elevation_deg: f64) -> f64 {
        let sin_elevation = (elevation_deg * DEG).sin();
        (1.0 / (sin_elevation + 0.50572 * (elevation_deg + 6.07995).powf(-1.6364))).max(1.0)
    }

    /// Global horizontal irradiance under a clear sky (W/m²)
    ///
    /// Beam transmittance follows `0.7^(AM^0.678)` with a linear altitude
    /// correction; diffuse light adds a fixed 10% on top of the beam.
    pub fn clear_sky_irradiance<Z: TimeZone>(&self, time: &DateTime<Z>) -> f64 {
        let (elevation_deg, _) = self.solar_position(time);
        if elevation_deg <= 0.0 {
            return 0.0;
        }

        let b = day_angle(time.with_timezone(&Utc));
        let air_mass = Self::air_mass(elevation_deg);
        let altitude_km = (self.elevation_m / 1000.0).max(0.0);
        let beam_fraction = (1.0 - 0.14 * altitude_km) * 0.7_f64.powf(air_mass.powf(0.678))
            + 0.14 * altitude_km;
        let direct_normal = extraterrestrial_irradiance(b) * beam_fraction;

        DIFFUSE_FACTOR * direct_normal * (elevation_deg * DEG).sin()
    }
}
