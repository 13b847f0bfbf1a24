//! Turns raw forecast windows into one UTC-anchored hourly series.
//!
//! This part knows nothing about HTML. It works on [`RawForecastWindow`],
//! the tidy hand-off produced by the page adapter, and owns the timestamp
//! reconciliation: timezone labels, year inference, localisation, merging
//! of overlapping windows and numeric coercion.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::timezone::tz_to_gmt_offset;
use crate::domain::{ForecastRecord, ForecastSeries};
use crate::error::{Error, Result};

/// One forecast hour as printed: date (only where the day changes), hour of
/// day and the remaining cells in `RawForecastWindow::fields` order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHourRow {
    pub date: Option<String>,
    pub hour: String,
    pub values: Vec<String>,
}

/// A single fetched forecast window before any type conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecastWindow {
    pub lead_hours: u32,
    pub timezone_label: String,
    pub fields: Vec<String>,
    pub rows: Vec<RawHourRow>,
    pub fetched_at: DateTime<Utc>,
}

/// Year for a month/day row given the month and year at fetch time.
///
/// Months earlier than the current month belong to the next year, which
/// covers a forecast running from late December into January.
pub fn infer_year(row_month: u32, current_month: u32, current_year: i32) -> i32 {
    if row_month >= current_month {
        current_year
    } else {
        current_year + 1
    }
}

/// Numeric value of a table cell, or `None` when it is not a number
pub fn parse_cell(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            if !trimmed.is_empty() {
                debug!(cell = trimmed, "non-numeric forecast cell recorded as missing");
            }
            None
        }
    }
}

fn parse_month_day(date: &str, lead_hours: u32) -> Result<(u32, u32)> {
    let malformed = || {
        Error::lookup(
            "nws",
            format!("window +{lead_hours}h: unparseable date cell {date:?}"),
        )
    };
    let (month, day) = date.trim().split_once('/').ok_or_else(malformed)?;
    let month = month.trim().parse::<u32>().map_err(|_| malformed())?;
    let day = day.trim().parse::<u32>().map_err(|_| malformed())?;
    Ok((month, day))
}

/// Convert one raw window into records stamped in UTC.
///
/// Returns the window's fixed-offset zone alongside the records.
pub fn window_records(window: &RawForecastWindow) -> Result<(Tz, Vec<ForecastRecord>)> {
    let zone = tz_to_gmt_offset(&window.timezone_label)?;
    let fetched_local = window.fetched_at.with_timezone(&zone);
    let (current_year, current_month) = (fetched_local.year(), fetched_local.month());

    let mut month_day: Option<(u32, u32)> = None;
    let mut records = Vec::with_capacity(window.rows.len());

    for row in &window.rows {
        if let Some(date) = row.date.as_deref().filter(|d| !d.trim().is_empty()) {
            month_day = Some(parse_month_day(date, window.lead_hours)?);
        }
        let (month, day) = month_day.ok_or_else(|| {
            Error::lookup(
                "nws",
                format!("window +{}h: first row has no date", window.lead_hours),
            )
        })?;

        let hour = row
            .hour
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|h| (0..24).contains(h))
            .ok_or_else(|| {
                Error::lookup(
                    "nws",
                    format!("window +{}h: unparseable hour cell {:?}", window.lead_hours, row.hour),
                )
            })?;

        if row.values.len() != window.fields.len() {
            return Err(Error::lookup(
                "nws",
                format!(
                    "window +{}h: row has {} values for {} fields",
                    window.lead_hours,
                    row.values.len(),
                    window.fields.len()
                ),
            ));
        }

        let year = infer_year(month, current_month, current_year);
        let midnight = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| {
                Error::lookup(
                    "nws",
                    format!("window +{}h: invalid date {year}-{month}-{day}", window.lead_hours),
                )
            })?;
        let local = zone
            .from_local_datetime(&(midnight + Duration::hours(hour)))
            .single()
            .ok_or_else(|| {
                Error::lookup("nws", format!("window +{}h: ambiguous local time", window.lead_hours))
            })?;

        let fields = window
            .fields
            .iter()
            .cloned()
            .zip(row.values.iter().map(|v| parse_cell(v)));
        records.push(ForecastRecord::from_fields(local.with_timezone(&Utc), fields));
    }

    Ok((zone, records))
}

/// Merge windows, given in fetch order, into one series.
///
/// Hours covered by several windows keep the value from the earliest window
/// in the slice.
pub fn merge_windows(windows: &[RawForecastWindow]) -> Result<ForecastSeries> {
    let mut zone = None;
    let mut records = Vec::new();
    for window in windows {
        let (window_zone, window_records) = window_records(window)?;
        zone.get_or_insert(window_zone);
        records.extend(window_records);
    }

    let zone = zone.ok_or_else(|| Error::lookup("nws", "no forecast windows to merge"))?;
    Ok(ForecastSeries::new(zone, records))
}
