//! # Heat Flux Model
//!
//! Pure functions turning forecast weather, clear-sky irradiance and a water
//! temperature into surface heat-flux components, a net flux, a cooling rate
//! and a labeled energy-balance table.

pub mod balance;
pub mod model;
pub mod physics;

pub use balance::*;
pub use model::*;
pub use physics::{cooling_rate, WindFunction};
