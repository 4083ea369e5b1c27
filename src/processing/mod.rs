// src/processing/mod.rs
//! Range, depth and backscatter for decoded samples
//!
//! - [`GeometryMapper`] turns a scan index and the packet pressure into
//!   distance from the transducer and depth
//! - [`BackscatterTransform`] turns a raw count into Sv and TS
//! - [`build_sample_table`] joins both with the per-beam calibration

mod backscatter;
mod geometry;
mod sample;

pub use backscatter::{Backscatter, BackscatterTransform, SNR_FLOOR_DB};
pub use geometry::{Geometry, GeometryMapper};
pub use sample::{build_sample_table, BeamCalibration, DecodedSample, SampleSource};
