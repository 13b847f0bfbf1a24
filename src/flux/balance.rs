use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{FluxComponents, FluxSeries};

/// Column labels of the energy-balance table, in display order
pub const COLUMNS: [&str; 6] = [
    "downwelling SW",
    "downwelling LW",
    "upwelling LW",
    "sensible heat",
    "latent heat",
    "net flux",
];

/// One timestamp of the energy balance with losses stored as negative values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyBalanceRow {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "downwelling SW")]
    pub downwelling_sw: Option<f64>,
    #[serde(rename = "downwelling LW")]
    pub downwelling_lw: Option<f64>,
    #[serde(rename = "upwelling LW")]
    pub upwelling_lw: Option<f64>,
    #[serde(rename = "sensible heat")]
    pub sensible_heat: Option<f64>,
    #[serde(rename = "latent heat")]
    pub latent_heat: Option<f64>,
    #[serde(rename = "net flux")]
    pub net_flux: Option<f64>,
}

impl EnergyBalanceRow {
    pub fn new(timestamp: DateTime<Utc>, components: Option<&FluxComponents>) -> Self {
        let Some(c) = components else {
            return Self {
                timestamp,
                downwelling_sw: None,
                downwelling_lw: None,
                upwelling_lw: None,
                sensible_heat: None,
                latent_heat: None,
                net_flux: None,
            };
        };

        let signed = [
            c.shortwave_down,
            c.longwave_down,
            -c.longwave_up,
            c.sensible_heat,
            -c.latent_heat,
        ];
        Self {
            timestamp,
            downwelling_sw: Some(signed[0]),
            downwelling_lw: Some(signed[1]),
            upwelling_lw: Some(signed[2]),
            sensible_heat: Some(signed[3]),
            latent_heat: Some(signed[4]),
            net_flux: Some(signed.iter().sum()),
        }
    }

    /// Values in `COLUMNS` order
    pub fn values(&self) -> [Option<f64>; 6] {
        [
            self.downwelling_sw,
            self.downwelling_lw,
            self.upwelling_lw,
            self.sensible_heat,
            self.latent_heat,
            self.net_flux,
        ]
    }
}

/// Labeled reporting view over a flux series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyBalanceTable {
    rows: Vec<EnergyBalanceRow>,
}

impl EnergyBalanceTable {
    pub fn from_fluxes(fluxes: &FluxSeries) -> Self {
        Self {
            rows: fluxes
                .rows()
                .iter()
                .map(|r| EnergyBalanceRow::new(r.timestamp, r.components.as_ref()))
                .collect(),
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn rows(&self) -> &[EnergyBalanceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
