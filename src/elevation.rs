//! Site elevation lookup (OpenTopoData)

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.opentopodata.org";
pub const DEFAULT_DATASET: &str = "ned10m";

/// Source of ground elevation for a coordinate
#[async_trait]
pub trait ElevationSource: Send + Sync {
    /// Elevation in meters above sea level
    async fn elevation(&self, latitude: f64, longitude: f64) -> Result<f64>;
}

#[derive(Debug, Deserialize)]
struct ElevationResponse {
    #[serde(default)]
    results: Vec<ElevationResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ElevationResult {
    elevation: Option<f64>,
}

/// OpenTopoData REST client
#[derive(Clone)]
pub struct OpenTopoDataClient {
    client: Client,
    base_url: String,
    dataset: String,
}

impl OpenTopoDataClient {
    pub fn new(
        base_url: impl Into<String>,
        dataset: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
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
            dataset: dataset.into(),
        })
    }
}

fn parse_elevation(body: ElevationResponse, latitude: f64, longitude: f64) -> Result<f64> {
    if let Some(message) = body.error {
        return Err(Error::lookup("opentopodata", message));
    }
    body.results
        .first()
        .and_then(|r| r.elevation)
        .filter(|e| e.is_finite())
        .ok_or_else(|| {
            Error::lookup(
                "opentopodata",
                format!("no elevation for ({latitude}, {longitude})"),
            )
        })
}

#[async_trait]
impl ElevationSource for OpenTopoDataClient {
    async fn elevation(&self, latitude: f64, longitude: f64) -> Result<f64> {
        let url = format!(
            "{}/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.dataset
        );
        debug!(%url, latitude, longitude, "fetching elevation");

        let response = self
            .client
            .get(&url)
            .query(&[("locations", format!("{latitude},{longitude}"))])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "elevation service returned error status");
            return Err(Error::lookup("opentopodata", format!("HTTP {status}")));
        }

        let body: ElevationResponse = response.json().await?;
        let elevation = parse_elevation(body, latitude, longitude)?;
        info!(latitude, longitude, elevation_m = elevation, "resolved site elevation");
        Ok(elevation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<f64> {
        let body: ElevationResponse = serde_json::from_str(json).unwrap();
        parse_elevation(body, 39.74, -104.99)
    }

    #[test]
    fn test_first_result_elevation() {
        let json = r#"{"results":[{"dataset":"ned10m","elevation":1608.6,
            "location":{"lat":39.74,"lng":-104.99}}],"status":"OK"}"#;
        assert_eq!(parse(json).unwrap(), 1608.6);
    }

    #[test]
    fn test_null_elevation_is_lookup_failure() {
        let json = r#"{"results":[{"dataset":"ned10m","elevation":null}],"status":"OK"}"#;
        assert!(matches!(parse(json), Err(Error::LookupFailure { .. })));
    }

    #[test]
    fn test_empty_results_is_lookup_failure() {
        assert!(matches!(
            parse(r#"{"results":[],"status":"OK"}"#),
            Err(Error::LookupFailure { .. })
        ));
    }

    #[test]
    fn test_service_error_message_is_kept() {
        let err = parse(r#"{"error":"Invalid locations","status":"INVALID_REQUEST"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("Invalid locations"));
    }
}
