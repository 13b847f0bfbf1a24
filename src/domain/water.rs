use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Water surface temperature in °C, supplied by the caller
///
/// The flux model does not evolve it; it is an external forcing that is
/// either held constant or given per forecast timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WaterTemperature {
    Constant(f64),
    Series(Vec<f64>),
}

impl WaterTemperature {
    /// Check that a per-timestamp series covers exactly `len` timestamps
    pub fn check_len(&self, len: usize) -> Result<()> {
        match self {
            WaterTemperature::Constant(_) => Ok(()),
            WaterTemperature::Series(values) if values.len() == len => Ok(()),
            WaterTemperature::Series(values) => Err(Error::misaligned(
                format!("{len} water temperatures"),
                values.len(),
            )),
        }
    }

    /// Water temperature at row `index`
    pub fn at(&self, index: usize) -> Option<f64> {
        match self {
            WaterTemperature::Constant(t) => Some(*t),
            WaterTemperature::Series(values) => values.get(index).copied(),
        }
    }
}

impl From<f64> for WaterTemperature {
    fn from(t: f64) -> Self {
        WaterTemperature::Constant(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_applies_to_every_row() {
        let water = WaterTemperature::from(4.0);
        assert!(water.check_len(1000).is_ok());
        assert_eq!(water.at(999), Some(4.0));
    }

    #[test]
    fn test_series_length_must_match() {
        let water = WaterTemperature::Series(vec![4.0, 4.1, 4.2]);
        assert!(water.check_len(3).is_ok());
        assert!(matches!(
            water.check_len(4),
            Err(Error::MisalignedSeries { .. })
        ));
        assert_eq!(water.at(2), Some(4.2));
        assert_eq!(water.at(3), None);
    }
}
