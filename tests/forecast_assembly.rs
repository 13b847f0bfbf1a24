mod common;

use chrono::Duration;
use chrono_tz::Tz;
use common::{digital_page, mount_window, this_hour, Hour};
use std::time::Duration as StdDuration;
use water_heat_flux::forecast::{ForecastAssembler, NwsClient};
use water_heat_flux::Error;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LAT: f64 = 39.74;
const LON: f64 = -104.99;

fn hours(n: usize, temperature_f: f64) -> Vec<Hour> {
    (0..n)
        .map(|i| Hour::new(temperature_f + i as f64, 20.0, 5.0, 30.0))
        .collect()
}

fn assembler(server: &MockServer, lead_hours: Vec<u32>) -> ForecastAssembler<NwsClient> {
    let client = NwsClient::new(server.uri(), StdDuration::from_secs(5)).unwrap();
    ForecastAssembler::new(client).with_lead_hours(lead_hours)
}

#[tokio::test]
async fn test_windows_merge_into_one_hourly_series() {
    let server = MockServer::start().await;
    let start = this_hour();
    mount_window(&server, 0, digital_page("MST", Tz::Etc__GMTPlus7, start, &hours(30, 40.0))).await;
    mount_window(
        &server,
        24,
        digital_page("MST", Tz::Etc__GMTPlus7, start + Duration::hours(24), &hours(30, 90.0)),
    )
    .await;

    let series = assembler(&server, vec![0, 24])
        .full_forecast(LAT, LON)
        .await
        .unwrap();

    assert_eq!(series.len(), 54);
    assert_eq!(series.start(), Some(start));
    assert_eq!(series.end(), Some(start + Duration::hours(53)));
    assert!(series.gaps().is_empty());
    assert_eq!(series.zone(), Tz::Etc__GMTPlus7);

    let temps: Vec<_> = series.records().iter().map(|r| r.temperature_f).collect();
    // Hours 24..30 are in both windows; the earlier window wins
    assert_eq!(temps[24], Some(64.0));
    assert_eq!(temps[29], Some(69.0));
    assert_eq!(temps[30], Some(96.0));
    assert!(series.records().iter().all(|r| r.field("Wind Dir").is_none()));
}

#[tokio::test]
async fn test_timestamps_are_absolute_across_zones() {
    let server = MockServer::start().await;
    let start = this_hour();
    let page = digital_page("EDT", Tz::Etc__GMTPlus4, start, &hours(6, 60.0));
    mount_window(&server, 0, page).await;

    let series = assembler(&server, vec![0]).full_forecast(LAT, LON).await.unwrap();

    assert_eq!(series.start(), Some(start));
    assert_eq!(series.zone().name(), "Etc/GMT+4");
}

#[tokio::test]
async fn test_server_error_aborts_assembly() {
    let server = MockServer::start().await;
    let start = this_hour();
    mount_window(&server, 0, digital_page("MST", Tz::Etc__GMTPlus7, start, &hours(6, 40.0))).await;
    Mock::given(method("GET"))
        .and(path("/MapClick.php"))
        .and(query_param("AheadHour", "48"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut assembler = assembler(&server, vec![0, 48, 96]);
    let err = assembler.full_forecast(LAT, LON).await.unwrap_err();

    assert!(matches!(err, Error::LookupFailure { .. }), "{err}");
    assert!(assembler.cache().is_empty());
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_layout_change_is_lookup_failure() {
    let server = MockServer::start().await;
    mount_window(
        &server,
        0,
        "<html><body><p>This page has moved.</p></body></html>".to_string(),
    )
    .await;

    let err = assembler(&server, vec![0])
        .full_forecast(LAT, LON)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::LookupFailure { .. }));
}

#[tokio::test]
async fn test_unknown_timezone_label() {
    let server = MockServer::start().await;
    let page = digital_page("HST", Tz::Etc__GMTPlus10, this_hour(), &hours(6, 75.0));
    mount_window(&server, 0, page).await;

    let err = assembler(&server, vec![0])
        .full_forecast(LAT, LON)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnknownTimezoneLabel(ref label) if label == "HST"));
}

#[tokio::test]
async fn test_repeat_request_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/MapClick.php"))
        .and(query_param("textField1", LAT.to_string()))
        .and(query_param("textField2", LON.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(digital_page("MST", Tz::Etc__GMTPlus7, this_hour(), &hours(6, 40.0))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut assembler = assembler(&server, vec![0]);
    let first = assembler.full_forecast(LAT, LON).await.unwrap();
    let second = assembler.full_forecast(LAT, LON).await.unwrap();
    assert_eq!(first, second);
}
