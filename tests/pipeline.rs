mod common;

use chrono_tz::Tz;
use common::{digital_page, mount_elevation, mount_window, this_hour, Hour};
use std::time::Duration;
use water_heat_flux::domain::{GeoLocation, WaterTemperature};
use water_heat_flux::elevation::OpenTopoDataClient;
use water_heat_flux::flux::{physics, FluxModel, FluxParameters};
use water_heat_flux::forecast::{ForecastAssembler, NwsClient};
use water_heat_flux::pipeline::HeatFluxPipeline;
use water_heat_flux::Error;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LAT: f64 = 39.74;
const LON: f64 = -104.99;

fn pipeline(server: &MockServer) -> HeatFluxPipeline<NwsClient, OpenTopoDataClient> {
    let nws = NwsClient::new(server.uri(), Duration::from_secs(5)).unwrap();
    let elevation = OpenTopoDataClient::new(server.uri(), "ned10m", Duration::from_secs(5)).unwrap();
    HeatFluxPipeline::new(
        ForecastAssembler::new(nws).with_lead_hours(vec![0]),
        elevation,
        FluxModel::new(FluxParameters::default()),
    )
}

fn day(missing_temperature_at: Option<usize>) -> Vec<Hour> {
    (0..24)
        .map(|i| {
            let mut hour = Hour::new(35.0 + (i % 12) as f64, 25.0, 8.0, (i * 4) as f64);
            if missing_temperature_at == Some(i) {
                hour.temperature_f = None;
            }
            hour
        })
        .collect()
}

#[tokio::test]
async fn test_end_to_end_energy_balance() {
    let server = MockServer::start().await;
    let start = this_hour();
    mount_elevation(&server, LAT, LON, 1608.6).await;
    mount_window(&server, 0, digital_page("MDT", Tz::Etc__GMTPlus6, start, &day(None))).await;

    let depth_m = 2.0;
    let report = pipeline(&server)
        .run(
            &GeoLocation::new(LAT, LON),
            &WaterTemperature::Constant(4.0),
            depth_m,
        )
        .await
        .unwrap();

    assert_eq!(report.location.name(), "general location");
    assert_eq!(report.location.elevation_m(), 1608.6);
    assert_eq!(report.forecast.len(), 24);
    assert_eq!(report.clear_sky.timestamps(), report.forecast.timestamps());
    assert_eq!(report.energy_balance.len(), 24);
    assert_eq!(report.cooling_rate.len(), 24);

    for ((row, flux), rate) in report
        .energy_balance
        .rows()
        .iter()
        .zip(report.fluxes.rows())
        .zip(&report.cooling_rate)
    {
        let values = row.values();
        assert!(values.iter().all(Option::is_some));
        let parts: f64 = values[..5].iter().flatten().sum();
        let net = row.net_flux.unwrap();
        assert!((parts - net).abs() < 1e-9);

        let c = flux.components.unwrap();
        assert!((c.net_flux - net).abs() < 1e-9);
        assert!(row.upwelling_lw.unwrap() <= 0.0);
        assert_eq!(row.upwelling_lw, Some(-c.longwave_up));
        assert_eq!(row.latent_heat, Some(-c.latent_heat));

        let expected = net / (1000.0 * 4182.0 * depth_m) * 60.0;
        assert!((rate.rate_c_per_min.unwrap() - expected).abs() < 1e-15);
        assert_eq!(rate.timestamp, row.timestamp);
    }

    // Water at 4 °C radiates the same at every hour
    let first_up = report.fluxes.rows()[0].components.unwrap().longwave_up;
    assert!((first_up - physics::upwelling_longwave(4.0)).abs() < 1e-9);
}

#[tokio::test]
async fn test_missing_forecast_value_leaves_row_empty() {
    let server = MockServer::start().await;
    mount_elevation(&server, LAT, LON, 1608.6).await;
    mount_window(
        &server,
        0,
        digital_page("MDT", Tz::Etc__GMTPlus6, this_hour(), &day(Some(5))),
    )
    .await;

    let report = pipeline(&server)
        .run(&GeoLocation::new(LAT, LON), &WaterTemperature::Constant(4.0), 1.0)
        .await
        .unwrap();

    assert_eq!(report.forecast.len(), 24);
    assert_eq!(report.fluxes.rows()[5].components, None);
    assert!(report.energy_balance.rows()[5].values().iter().all(Option::is_none));
    assert_eq!(report.cooling_rate[5].rate_c_per_min, None);
    assert!(report.cooling_rate[4].rate_c_per_min.is_some());
    assert!(report.cooling_rate[6].rate_c_per_min.is_some());
}

#[tokio::test]
async fn test_water_series_must_match_forecast_length() {
    let server = MockServer::start().await;
    mount_elevation(&server, LAT, LON, 1608.6).await;
    mount_window(
        &server,
        0,
        digital_page("MDT", Tz::Etc__GMTPlus6, this_hour(), &day(None)),
    )
    .await;

    let err = pipeline(&server)
        .run(
            &GeoLocation::new(LAT, LON),
            &WaterTemperature::Series(vec![4.0; 10]),
            1.0,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MisalignedSeries { .. }));
}

#[tokio::test]
async fn test_elevation_failure_is_lookup_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ned10m"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = pipeline(&server)
        .run(&GeoLocation::new(LAT, LON), &WaterTemperature::Constant(4.0), 1.0)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::LookupFailure { ref source_name, .. } if source_name == "opentopodata"));
}

#[tokio::test]
async fn test_non_positive_depth_is_rejected() {
    let server = MockServer::start().await;

    let err = pipeline(&server)
        .run(&GeoLocation::new(LAT, LON), &WaterTemperature::Constant(4.0), 0.0)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
