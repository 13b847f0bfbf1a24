//! National Weather Service digital tabular forecast (forecast.weather.gov)
//!
//! The page is scraped rather than queried through an API, so everything
//! that depends on its HTML layout lives in [`parse_digital_table`]. When the
//! layout drifts, this adapter is the only place that changes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info};

use super::assembly::{RawForecastWindow, RawHourRow};
use super::ForecastSource;
use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://forecast.weather.gov";

const DATE_LABEL: &str = "Date";
const HOUR_LABEL: &str = "Hour";

/// Client for the NWS `MapClick.php` digital forecast page
#[derive(Clone)]
pub struct NwsClient {
    client: Client,
    base_url: String,
}

impl NwsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("water-heat-flux/0.1 (surface energy balance)"),
        );
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn query(latitude: f64, longitude: f64, lead_hours: u32) -> Vec<(&'static str, String)> {
        let fixed = [
            ("w0", "t"),
            ("w1", "td"),
            ("w2", "wc"),
            ("w3", "sfcwind"),
            ("w3u", "1"),
            ("w4", "sky"),
            ("w5", "pop"),
            ("w6", "rh"),
            ("w7", "rain"),
            ("w8", "thunder"),
            ("w9", "snow"),
            ("w10", "fzg"),
            ("w11", "sleet"),
            ("w13u", "0"),
            ("w16u", "1"),
            ("w17u", "1"),
        ];
        let mut query: Vec<(&'static str, String)> =
            fixed.iter().map(|(k, v)| (*k, v.to_string())).collect();
        query.extend([
            ("AheadHour", lead_hours.to_string()),
            ("Submit", "Submit".to_string()),
            ("FcstType", "digital".to_string()),
            ("textField1", latitude.to_string()),
            ("textField2", longitude.to_string()),
            ("site", "all".to_string()),
            ("unit", "0".to_string()),
            ("dd", String::new()),
            ("bw", String::new()),
        ]);
        query
    }
}

#[async_trait]
impl ForecastSource for NwsClient {
    async fn fetch_window(
        &self,
        latitude: f64,
        longitude: f64,
        lead_hours: u32,
    ) -> Result<RawForecastWindow> {
        let url = format!("{}/MapClick.php", self.base_url.trim_end_matches('/'));
        debug!(%url, latitude, longitude, lead_hours, "fetching NWS digital forecast");

        let fetched_at = Utc::now();
        let response = self
            .client
            .get(&url)
            .query(&Self::query(latitude, longitude, lead_hours))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, lead_hours, "NWS forecast page returned error status");
            return Err(Error::lookup("nws", format!("HTTP {status}")));
        }
        let html = response.text().await?;

        let window = parse_digital_table(&html, lead_hours, fetched_at)?;
        info!(
            lead_hours,
            hours = window.rows.len(),
            timezone = %window.timezone_label,
            "fetched NWS forecast window"
        );
        Ok(window)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::lookup("nws", format!("invalid selector {css}: {e}")))
}

/// Text of the direct `td`/`th` children of a table row
fn row_cells(row: ElementRef<'_>) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect()
}

/// Group table rows into blocks. A block opens at a `Date` row and takes
/// every following labeled row of the same width.
fn collect_blocks(rows: impl Iterator<Item = Vec<String>>) -> Vec<Vec<Vec<String>>> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<Vec<String>>> = None;

    for cells in rows {
        if cells.len() > 1 && cells[0] == DATE_LABEL {
            blocks.extend(current.replace(vec![cells]));
            continue;
        }
        let fits = current
            .as_ref()
            .is_some_and(|block| block[0].len() == cells.len() && !cells[0].is_empty());
        if fits {
            if let Some(block) = current.as_mut() {
                block.push(cells);
            }
        } else {
            blocks.extend(current.take());
        }
    }
    blocks.extend(current);
    blocks
}

/// Extract the hourly forecast from a digital forecast page.
///
/// The page prints the forecast as row-per-variable blocks of hourly
/// columns; this transposes them into one row per hour.
pub fn parse_digital_table(
    html: &str,
    lead_hours: u32,
    fetched_at: DateTime<Utc>,
) -> Result<RawForecastWindow> {
    let document = Html::parse_document(html);
    let tr = selector("tr")?;
    let blocks = collect_blocks(document.select(&tr).map(row_cells));

    let first = blocks.first().ok_or_else(|| {
        Error::lookup("nws", format!("window +{lead_hours}h: digital forecast table not found"))
    })?;

    let hour_label = first
        .iter()
        .map(|r| r[0].as_str())
        .find(|label| label.starts_with(HOUR_LABEL))
        .ok_or_else(|| Error::lookup("nws", format!("window +{lead_hours}h: no hour row")))?
        .to_string();
    let timezone_label = hour_label[HOUR_LABEL.len()..]
        .trim()
        .trim_matches(|c| c == '(' || c == ')')
        .trim()
        .to_string();

    let fields: Vec<String> = first
        .iter()
        .map(|r| r[0].clone())
        .filter(|label| label != DATE_LABEL && *label != hour_label)
        .collect();

    let mut rows = Vec::new();
    for block in &blocks {
        let by_label: HashMap<&str, &[String]> = block
            .iter()
            .map(|r| (r[0].as_str(), &r[1..]))
            .collect();
        let column = |label: &str| {
            by_label.get(label).copied().ok_or_else(|| {
                Error::lookup(
                    "nws",
                    format!("window +{lead_hours}h: block is missing row {label:?}"),
                )
            })
        };

        let dates = column(DATE_LABEL)?;
        let hours = column(hour_label.as_str())?;
        let values = fields
            .iter()
            .map(|f| column(f.as_str()))
            .collect::<Result<Vec<_>>>()?;

        for (i, hour) in hours.iter().enumerate() {
            rows.push(RawHourRow {
                date: dates.get(i).filter(|d| !d.is_empty()).cloned(),
                hour: hour.clone(),
                values: values
                    .iter()
                    .map(|v| v.get(i).cloned().unwrap_or_default())
                    .collect(),
            });
        }
    }

    Ok(RawForecastWindow {
        lead_hours,
        timezone_label,
        fields,
        rows,
        fetched_at,
    })
}
