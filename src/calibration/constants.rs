// src/calibration/constants.rs
use std::f64::consts::PI;

/// Calibration constants for a single beam
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationConstants {
    pub gain: f64,
    pub ts_gain: f64,
    pub noise: f64,
    pub cal_noise: f64,
    pub source_level: f64,
    pub pulse_duration_s: f64,
    pub beam_angle_deg: f64,
    pub beam_angle_rad: f64,
    pub attenuation: f64,
    pub sound_speed: f64,
    pub counts_per_db: f64,
}

/// Acoustic beam parameters derived from the calibration and the beam's
/// nominal frequency
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BeamAcoustics {
    /// Nominal wavelength, m
    pub wavelength_m: f64,
    /// Wavenumber, rad/m
    pub wavenumber: f64,
    /// Equivalent circular-aperture radius, m
    pub aperture_m: f64,
    /// Equivalent beam angle Ψ, dB re 1 sr
    pub equivalent_beam_angle_db: f64,
}

impl BeamAcoustics {
    pub fn derive(constants: &CalibrationConstants, nominal_freq_khz: i16) -> Self {
        let frequency_hz = nominal_freq_khz as f64 * 1000.0;
        let wavelength_m = constants.sound_speed / frequency_hz;
        let wavenumber = 2.0 * PI / wavelength_m;
        let half_angle_sin = (constants.beam_angle_rad / 2.0).sin();
        let aperture_m = 1.6 / (wavenumber * half_angle_sin);

        // k·a reduces to 1.6 / sin(θ/2), so Ψ stays defined even when the
        // frequency field is zero
        let ka = 1.6 / half_angle_sin;
        let equivalent_beam_angle_db = 10.0 * (5.78 / (ka * ka)).log10();

        BeamAcoustics {
            wavelength_m,
            wavenumber,
            aperture_m,
            equivalent_beam_angle_db,
        }
    }
}
