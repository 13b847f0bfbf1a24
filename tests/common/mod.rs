//! Shared fixtures: NWS digital-forecast pages and mock servers

#![allow(dead_code)]

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Forecast values for one hour; `None` prints an empty cell
#[derive(Debug, Clone, Copy)]
pub struct Hour {
    pub temperature_f: Option<f64>,
    pub dewpoint_f: Option<f64>,
    pub wind_mph: Option<f64>,
    pub sky_pct: Option<f64>,
}

impl Hour {
    pub fn new(temperature_f: f64, dewpoint_f: f64, wind_mph: f64, sky_pct: f64) -> Self {
        Self {
            temperature_f: Some(temperature_f),
            dewpoint_f: Some(dewpoint_f),
            wind_mph: Some(wind_mph),
            sky_pct: Some(sky_pct),
        }
    }
}

/// Current UTC hour, truncated
pub fn this_hour() -> DateTime<Utc> {
    let now = Utc::now();
    Utc.with_ymd_and_hms(now.year(), now.month(), now.day(), now.hour(), 0, 0)
        .unwrap()
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v}")).unwrap_or_default()
}

fn table_row(label: &str, cells: &[String]) -> String {
    let tds: String = cells
        .iter()
        .map(|c| format!("<td class=\"cell\">{c}</td>"))
        .collect();
    format!("<tr align=\"center\"><td align=\"left\"><b>{label}</b></td>{tds}</tr>")
}

/// Render a digital forecast page starting at `start`, one column per hour
/// in blocks of up to 24 hours, with hours printed in `zone` under `label`
pub fn digital_page(label: &str, zone: Tz, start: DateTime<Utc>, hours: &[Hour]) -> String {
    let mut html = String::from(
        "<html><body><table><tr><td><img src=\"logo.png\"></td></tr></table>\
         <table border=\"0\" width=\"800\">\
         <tr><td colspan=\"25\">Hourly Weather Forecast</td></tr>",
    );

    for (block_index, block) in hours.chunks(24).enumerate() {
        let mut dates = Vec::new();
        let mut hour_cells = Vec::new();
        for i in 0..block.len() {
            let local = (start + Duration::hours((block_index * 24 + i) as i64)).with_timezone(&zone);
            let date = if i == 0 || local.hour() == 0 {
                format!("{:02}/{:02}", local.month(), local.day())
            } else {
                String::new()
            };
            dates.push(date);
            hour_cells.push(format!("{:02}", local.hour()));
        }

        if block_index > 0 {
            html += "<tr><td>&nbsp;</td></tr>";
        }
        html += &table_row("Date", &dates);
        html += &table_row(&format!("Hour ({label})"), &hour_cells);
        html += &table_row(
            "Temperature (°F)",
            &block.iter().map(|h| cell(h.temperature_f)).collect::<Vec<_>>(),
        );
        html += &table_row(
            "Dewpoint (°F)",
            &block.iter().map(|h| cell(h.dewpoint_f)).collect::<Vec<_>>(),
        );
        html += &table_row(
            "Surface Wind (mph)",
            &block.iter().map(|h| cell(h.wind_mph)).collect::<Vec<_>>(),
        );
        html += &table_row(
            "Wind Dir",
            &block.iter().map(|_| "SW".to_string()).collect::<Vec<_>>(),
        );
        html += &table_row(
            "Sky Cover (%)",
            &block.iter().map(|h| cell(h.sky_pct)).collect::<Vec<_>>(),
        );
    }

    html += "</table></body></html>";
    html
}

/// Serve `page` for the window with the given lead time
pub async fn mount_window(server: &MockServer, lead_hours: u32, page: String) {
    Mock::given(method("GET"))
        .and(path("/MapClick.php"))
        .and(query_param("AheadHour", lead_hours.to_string()))
        .and(query_param("FcstType", "digital"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(server)
        .await;
}

pub async fn mount_elevation(server: &MockServer, latitude: f64, longitude: f64, elevation: f64) {
    Mock::given(method("GET"))
        .and(path("/v1/ned10m"))
        .and(query_param("locations", format!("{latitude},{longitude}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{
                "dataset": "ned10m",
                "elevation": elevation,
                "location": { "lat": latitude, "lng": longitude }
            }],
            "status": "OK"
        })))
        .mount(server)
        .await;
}
