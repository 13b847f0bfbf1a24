//! # Surface Heat Flux Formulas
//!
//! Empirical point formulas for the energy exchange at a water surface,
//! following the HEC-RAS 5.0 water-temperature heat-flux terms with the
//! Zhang & Johnson (2016) emissivity and saturation-vapour-pressure fits.
//!
//! Units: fluxes in W/m², temperatures in °C unless a Kelvin conversion is
//! written inline, wind in m/s, cloud cover as a fraction in [0, 1],
//! pressure and vapour pressures in millibars.

use serde::{Deserialize, Serialize};

use crate::domain::KELVIN_OFFSET;

/// Stefan–Boltzmann constant, W m⁻² K⁻⁴
pub const STEFAN_BOLTZMANN: f64 = 5.670374419e-8;

/// Emissivity of the water surface
pub const WATER_EMISSIVITY: f64 = 0.97;

/// Density of water, kg/m³
pub const WATER_DENSITY: f64 = 1000.0;

/// Specific heat of water, J/(kg·K)
pub const WATER_SPECIFIC_HEAT: f64 = 4182.0;

/// Specific heat of air at constant pressure, J/(kg·K)
pub const AIR_SPECIFIC_HEAT: f64 = 1.006e3;

/// Ratio of molecular weights of water vapour and dry air
pub const VAPOR_MASS_RATIO: f64 = 0.622;

/// Water surface reflectivity (Maidment et al., 1996)
pub const DEFAULT_REFLECTIVITY: f64 = 0.15;

/// Surface pressure used when no pressure forecast exists, mb
pub const DEFAULT_PRESSURE_MB: f64 = 1000.0;

/// Absorbed shortwave radiation
///
/// Clear-sky irradiance reduced by surface reflection and a quadratic cloud
/// attenuation.
///
/// # Arguments
///
/// * 'ghi' - clear-sky global horizontal irradiance, W/m²
/// * 'reflectivity' - fraction of shortwave reflected by the surface
/// * 'cloud_fraction' - cloud cover in [0, 1]
pub fn solar_shortwave(ghi: f64, reflectivity: f64, cloud_fraction: f64) -> f64 {
    ghi * (1.0 - reflectivity) * (1.0 - 0.65 * cloud_fraction.powi(2))
}

/// Downwelling (atmospheric) longwave radiation
///
/// # Arguments
///
/// * 'air_temp_c' - air temperature, °C
/// * 'cloud_fraction' - cloud cover in [0, 1]
pub fn downwelling_longwave(air_temp_c: f64, cloud_fraction: f64) -> f64 {
    let tak = air_temp_c + KELVIN_OFFSET;
    let emissivity = atmospheric_emissivity(tak, cloud_fraction);
    emissivity * STEFAN_BOLTZMANN * tak.powi(4)
}

/// Emissivity of the atmosphere as a function of air temperature (K) and cloud
fn atmospheric_emissivity(air_temp_k: f64, cloud_fraction: f64) -> f64 {
    0.937e-5 * (1.0 + 0.17 * cloud_fraction.powi(2)) * air_temp_k.powi(2)
}

/// Upwelling (back) longwave radiation emitted by the water surface
///
/// # Arguments
///
/// * 'water_temp_c' - water surface temperature, °C
pub fn upwelling_longwave(water_temp_c: f64) -> f64 {
    let twk = water_temp_c + KELVIN_OFFSET;
    WATER_EMISSIVITY * STEFAN_BOLTZMANN * twk.powi(4)
}

/// Empirical wind function `f(U) = R * (a + b * U^c)`
///
/// The coefficients are site calibration parameters; the defaults are the
/// uncalibrated values used for screening.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindFunction {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub r: f64,
}

impl Default for WindFunction {
    fn default() -> Self {
        Self {
            a: 1e-6,
            b: 1e-6,
            c: 1.0,
            r: 1.0,
        }
    }
}

impl WindFunction {
    /// Evaluate for a wind speed in m/s
    pub fn eval(&self, wind_ms: f64) -> f64 {
        self.r * (self.a + self.b * wind_ms.powf(self.c))
    }
}

/// Saturation vapour pressure over water, mb
///
/// Sixth-order polynomial in water temperature (K) from Zhang & Johnson (2016).
pub fn saturation_vapor_pressure(water_temp_c: f64) -> f64 {
    let twk = water_temp_c + KELVIN_OFFSET;
    6984.505294
        + twk
            * (-188.903931
                + twk
                    * (2.133357675
                        + twk
                            * (-1.28858097e-2
                                + twk
                                    * (4.393587233e-5
                                        + twk * (-8.023923082e-8 + twk * 6.136820929e-11)))))
}

/// Vapour pressure of the air from its dewpoint, mb (Magnus form)
pub fn vapor_pressure(dewpoint_c: f64) -> f64 {
    6.11 * 10f64.powf(7.5 * dewpoint_c / (237.3 + dewpoint_c))
}

/// Latent heat of vaporization at a water temperature in °C, J/kg
pub fn latent_heat_of_vaporization(water_temp_c: f64) -> f64 {
    2.500e6 - 2.386e3 * water_temp_c
}

/// Latent (evaporative) heat flux; positive values are a loss from the water
///
/// # Arguments
///
/// * 'pressure_mb' - surface air pressure, mb
/// * 'water_temp_c' - water surface temperature, °C
/// * 'ea' - air vapour pressure, mb
/// * 'f_u' - wind function value
pub fn latent_heat(pressure_mb: f64, water_temp_c: f64, ea: f64, f_u: f64) -> f64 {
    let lv = latent_heat_of_vaporization(water_temp_c);
    let es = saturation_vapor_pressure(water_temp_c);
    VAPOR_MASS_RATIO / pressure_mb * lv * WATER_DENSITY * (es - ea) * f_u
}

/// Sensible heat flux; positive when the air is warmer than the water
pub fn sensible_heat(air_temp_c: f64, f_u: f64, water_temp_c: f64) -> f64 {
    AIR_SPECIFIC_HEAT * WATER_DENSITY * (air_temp_c - water_temp_c) * f_u
}

/// Net heat flux into the water
///
/// Shortwave, downwelling longwave and sensible heat are gains; upwelling
/// longwave and latent heat are losses.
pub fn net_flux(q_sw: f64, q_atm: f64, q_b: f64, q_h: f64, q_l: f64) -> f64 {
    q_sw + q_atm - q_b + q_h - q_l
}

/// Rate of change of a well-mixed water column's temperature, °C/min
///
/// # Arguments
///
/// * 'q_net' - net heat flux, W/m²
/// * 'depth_m' - depth of the water column, m
pub fn cooling_rate(q_net: f64, depth_m: f64) -> f64 {
    q_net / (WATER_DENSITY * WATER_SPECIFIC_HEAT * depth_m) * 60.0
}
