//! # Heat-Flux Pipeline
//!
//! Runs one site end to end: elevation → forecast → clear sky → fluxes →
//! energy balance → cooling rate. Every step runs sequentially and the
//! first structural failure aborts the run.

use serde::Serialize;
use tracing::{info, instrument};

use crate::domain::{ClearSkySeries, ForecastSeries, GeoLocation, Location, WaterTemperature};
use crate::elevation::ElevationSource;
use crate::error::{Error, Result};
use crate::flux::{CoolingRatePoint, EnergyBalanceTable, FluxModel, FluxSeries};
use crate::forecast::{ForecastAssembler, ForecastSource};
use crate::solar::{clear_sky_series, hourly_range};

/// Everything produced for one site
#[derive(Debug, Clone, Serialize)]
pub struct HeatFluxReport {
    pub location: Location,
    pub forecast: ForecastSeries,
    pub clear_sky: ClearSkySeries,
    pub fluxes: FluxSeries,
    pub energy_balance: EnergyBalanceTable,
    pub cooling_rate: Vec<CoolingRatePoint>,
}

/// Clear-sky GHI evaluated hourly over the forecast span in the
/// forecast's zone, then aligned to the forecast timestamps
pub fn solar_input(location: &Location, forecast: &ForecastSeries) -> Result<ClearSkySeries> {
    let (Some(start), Some(end)) = (forecast.start(), forecast.end()) else {
        return Ok(ClearSkySeries::default());
    };
    let range = hourly_range(start, end, &forecast.zone());
    clear_sky_series(location, &range).aligned_to(&forecast.timestamps())
}

pub struct HeatFluxPipeline<F: ForecastSource, E: ElevationSource> {
    assembler: ForecastAssembler<F>,
    elevation: E,
    model: FluxModel,
}

impl<F: ForecastSource, E: ElevationSource> HeatFluxPipeline<F, E> {
    pub fn new(assembler: ForecastAssembler<F>, elevation: E, model: FluxModel) -> Self {
        Self {
            assembler,
            elevation,
            model,
        }
    }

    pub fn assembler_mut(&mut self) -> &mut ForecastAssembler<F> {
        &mut self.assembler
    }

    #[instrument(skip(self, water), fields(lat = site.latitude, lon = site.longitude))]
    pub async fn run(
        &mut self,
        site: &GeoLocation,
        water: &WaterTemperature,
        depth_m: f64,
    ) -> Result<HeatFluxReport> {
        if !(depth_m.is_finite() && depth_m > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "water depth must be positive, got {depth_m}"
            )));
        }

        let elevation_m = self
            .elevation
            .elevation(site.latitude, site.longitude)
            .await?;
        let location = Location::new(site, elevation_m);

        let forecast = self
            .assembler
            .full_forecast(site.latitude, site.longitude)
            .await?;
        let clear_sky = solar_input(&location, &forecast)?;

        let fluxes = self.model.compute(&forecast, &clear_sky, water)?;
        let energy_balance = EnergyBalanceTable::from_fluxes(&fluxes);
        let cooling_rate = fluxes.cooling_rate(depth_m);

        info!(
            site = location.name(),
            elevation_m,
            hours = forecast.len(),
            complete_rows = fluxes.rows().iter().filter(|r| r.components.is_some()).count(),
            "heat-flux run complete"
        );

        Ok(HeatFluxReport {
            location,
            forecast,
            clear_sky,
            fluxes,
            energy_balance,
            cooling_rate,
        })
    }
}
