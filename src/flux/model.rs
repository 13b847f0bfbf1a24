use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::physics::{self, WindFunction, DEFAULT_PRESSURE_MB, DEFAULT_REFLECTIVITY};
use crate::domain::{ClearSkySeries, ForecastRecord, ForecastSeries, Temperature, WaterTemperature};
use crate::error::{Error, Result};

/// Site calibration parameters of the flux model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluxParameters {
    pub reflectivity: f64,
    pub pressure_mb: f64,
    pub wind: WindFunction,
}

impl Default for FluxParameters {
    fn default() -> Self {
        Self {
            reflectivity: DEFAULT_REFLECTIVITY,
            pressure_mb: DEFAULT_PRESSURE_MB,
            wind: WindFunction::default(),
        }
    }
}

/// Converted inputs for one timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxInputs {
    pub ghi_w_m2: f64,
    pub air_temp_c: f64,
    pub dewpoint_c: f64,
    pub wind_ms: f64,
    pub cloud_fraction: f64,
    pub water_temp_c: f64,
}

impl FluxInputs {
    /// Convert a forecast row to model units; `None` when a required field is missing
    pub fn from_record(record: &ForecastRecord, ghi_w_m2: f64, water_temp_c: f64) -> Option<Self> {
        Some(Self {
            ghi_w_m2,
            air_temp_c: record.air_temperature()?.as_celsius(),
            dewpoint_c: record.dewpoint()?.as_celsius(),
            wind_ms: record.wind_speed()?.as_meters_per_second(),
            cloud_fraction: record.sky_cover()?.as_ratio(),
            water_temp_c,
        })
    }
}

/// Heat-flux components in W/m², each as a positive magnitude in its own
/// direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluxComponents {
    pub shortwave_down: f64,
    pub longwave_down: f64,
    pub longwave_up: f64,
    pub latent_heat: f64,
    pub sensible_heat: f64,
    pub net_flux: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluxRow {
    pub timestamp: DateTime<Utc>,
    pub components: Option<FluxComponents>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoolingRatePoint {
    pub timestamp: DateTime<Utc>,
    /// °C per minute; negative when the water is losing heat
    pub rate_c_per_min: Option<f64>,
}

/// Flux components for every forecast timestamp
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FluxSeries {
    rows: Vec<FluxRow>,
}

impl FluxSeries {
    pub fn rows(&self) -> &[FluxRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn net_flux(&self) -> Vec<Option<f64>> {
        self.rows
            .iter()
            .map(|r| r.components.map(|c| c.net_flux))
            .collect()
    }

    /// Temperature change rate of a water column of the given depth
    pub fn cooling_rate(&self, depth_m: f64) -> Vec<CoolingRatePoint> {
        self.rows
            .iter()
            .map(|r| CoolingRatePoint {
                timestamp: r.timestamp,
                rate_c_per_min: r
                    .components
                    .map(|c| physics::cooling_rate(c.net_flux, depth_m)),
            })
            .collect()
    }
}

/// Applies the point formulas element-wise over aligned series
#[derive(Debug, Clone, Default)]
pub struct FluxModel {
    params: FluxParameters,
}

impl FluxModel {
    pub fn new(params: FluxParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FluxParameters {
        &self.params
    }

    /// All flux components for one set of inputs
    pub fn components(&self, inputs: &FluxInputs) -> FluxComponents {
        let q_sw = physics::solar_shortwave(
            inputs.ghi_w_m2,
            self.params.reflectivity,
            inputs.cloud_fraction,
        );
        let q_atm = physics::downwelling_longwave(inputs.air_temp_c, inputs.cloud_fraction);
        let q_b = physics::upwelling_longwave(inputs.water_temp_c);

        let f_u = self.params.wind.eval(inputs.wind_ms);
        let ea = physics::vapor_pressure(inputs.dewpoint_c);
        let q_l = physics::latent_heat(self.params.pressure_mb, inputs.water_temp_c, ea, f_u);
        let q_h = physics::sensible_heat(inputs.air_temp_c, f_u, inputs.water_temp_c);

        FluxComponents {
            shortwave_down: q_sw,
            longwave_down: q_atm,
            longwave_up: q_b,
            latent_heat: q_l,
            sensible_heat: q_h,
            net_flux: physics::net_flux(q_sw, q_atm, q_b, q_h, q_l),
        }
    }

    /// Compute fluxes for every forecast hour
    ///
    /// `clear_sky` must carry exactly the forecast's timestamps, and a water
    /// temperature series must have one value per forecast hour; otherwise
    /// this fails with `MisalignedSeries`. Rows with a missing input produce
    /// missing components.
    pub fn compute(
        &self,
        forecast: &ForecastSeries,
        clear_sky: &ClearSkySeries,
        water: &WaterTemperature,
    ) -> Result<FluxSeries> {
        if forecast.len() != clear_sky.len() {
            return Err(Error::misaligned(
                format!("{} clear-sky values", forecast.len()),
                clear_sky.len(),
            ));
        }
        water.check_len(forecast.len())?;

        let mut rows = Vec::with_capacity(forecast.len());
        for (i, (record, point)) in forecast
            .records()
            .iter()
            .zip(clear_sky.points())
            .enumerate()
        {
            if record.timestamp != point.timestamp {
                return Err(Error::misaligned(
                    record.timestamp.to_rfc3339(),
                    point.timestamp.to_rfc3339(),
                ));
            }

            let components = water
                .at(i)
                .and_then(|t| FluxInputs::from_record(record, point.ghi_w_m2, t))
                .map(|inputs| self.components(&inputs));
            if components.is_none() {
                debug!(timestamp = %record.timestamp, "missing flux input, row left empty");
            }

            rows.push(FluxRow {
                timestamp: record.timestamp,
                components,
            });
        }

        Ok(FluxSeries { rows })
    }
}

/// Convenience for callers holding a water temperature in °F
pub fn water_temperature_from_fahrenheit(f: f64) -> WaterTemperature {
    WaterTemperature::Constant(Temperature::fahrenheit(f).as_celsius())
}
