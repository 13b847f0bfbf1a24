use anyhow::{Context, Result};
use std::io::Write;
use tracing::info;
use water_heat_flux::config::Config;
use water_heat_flux::elevation::OpenTopoDataClient;
use water_heat_flux::flux::FluxModel;
use water_heat_flux::forecast::{ForecastAssembler, ForecastCache, NwsClient};
use water_heat_flux::pipeline::HeatFluxPipeline;
use water_heat_flux::telemetry::init_tracing;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load().context("loading configuration")?;
    let site = cfg.location.geo_location();

    let nws = NwsClient::new(&cfg.forecast.base_url, cfg.forecast.http_timeout())?;
    let cache = match cfg.forecast.cache_ttl() {
        Some(ttl) => ForecastCache::with_ttl(ttl),
        None => ForecastCache::new(),
    };
    let assembler = ForecastAssembler::new(nws)
        .with_lead_hours(cfg.forecast.lead_hours.clone())
        .with_cache(cache);
    let elevation = OpenTopoDataClient::new(
        &cfg.elevation.base_url,
        &cfg.elevation.dataset,
        cfg.elevation.http_timeout(),
    )?;

    let mut pipeline =
        HeatFluxPipeline::new(assembler, elevation, FluxModel::new(cfg.flux.parameters()));

    info!(lat = site.latitude, lon = site.longitude, "estimating surface heat flux");
    let report = pipeline
        .run(&site, &cfg.water.temperature(), cfg.water.depth_m)
        .await
        .with_context(|| format!("heat-flux run for ({}, {})", site.latitude, site.longitude))?;

    let output = serde_json::json!({
        "location": report.location,
        "columns": report.energy_balance.columns(),
        "energy_balance": report.energy_balance.rows(),
        "cooling_rate_c_per_min": report.cooling_rate,
    });
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output)?;
    writeln!(stdout)?;
    Ok(())
}
