// src/calibration/mod.rs
mod config;
mod constants;

pub use config::CalibrationConfig;
pub use constants::{BeamAcoustics, CalibrationConstants};
