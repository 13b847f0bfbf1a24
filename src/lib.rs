//! Surface heat flux and cooling rate of open water, estimated from the
//! National Weather Service hourly forecast and a clear-sky solar model.

pub mod config;
pub mod domain;
pub mod elevation;
pub mod error;
pub mod flux;
pub mod forecast;
pub mod pipeline;
pub mod solar;
pub mod telemetry;

pub use error::{Error, Result};
