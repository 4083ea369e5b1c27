// src/processing/backscatter.rs
use crate::calibration::{BeamAcoustics, CalibrationConstants};

/// Samples whose signal-to-noise ratio is at or below this floor get no
/// backscatter value, dB
pub const SNR_FLOOR_DB: f64 = 0.0;

/// Calibrated backscatter of one sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Backscatter {
    /// Volume backscattering strength, dB re 1 m^-1
    pub sv: f64,
    /// Target strength, dB re 1 m^2
    pub ts: f64,
    /// Signal-to-noise ratio, dB
    pub snr_db: f64,
}

/// Sonar-equation transform from raw A/D counts to Sv and TS for one beam
///
/// ```text
/// Sv = 10 log10(Lc - Ln) - SL - 10 log10(c τ / 2) - Ψ + 20 log10(r) + 2 α r + G
/// TS = 10 log10(Lc - Ln) - SL - 10 log10(c τ / 2)     + 40 log10(r) + 2 α r + G + G_ts
/// ```
///
/// with `Lc = 10^(counts / gn / 10)` and `Ln = 10^(noise / 10)`.
#[derive(Debug, Clone, Copy)]
pub struct BackscatterTransform {
    counts_per_db: f64,
    noise_db: f64,
    noise_linear: f64,
    source_level: f64,
    pulse_volume_db: f64,
    psi_db: f64,
    attenuation: f64,
    gain: f64,
    ts_gain: f64,
}

impl BackscatterTransform {
    pub fn new(constants: &CalibrationConstants, acoustics: &BeamAcoustics) -> Self {
        BackscatterTransform {
            counts_per_db: constants.counts_per_db,
            noise_db: constants.noise,
            noise_linear: 10f64.powf(constants.noise / 10.0),
            source_level: constants.source_level,
            pulse_volume_db: 10.0
                * (constants.sound_speed * constants.pulse_duration_s / 2.0).log10(),
            psi_db: acoustics.equivalent_beam_angle_db,
            attenuation: constants.attenuation,
            gain: constants.gain,
            ts_gain: constants.ts_gain,
        }
    }

    /// Signal-to-noise ratio of a raw count, dB
    pub fn snr_db(&self, raw_count: i16) -> f64 {
        raw_count as f64 / self.counts_per_db - self.noise_db
    }

    /// Calibrate one raw count at `range` metres from the transducer
    ///
    /// Returns `None` for samples at or below the SNR floor and for
    /// non-positive ranges, where the spreading terms are undefined.
    pub fn apply(&self, raw_count: i16, range: f64) -> Option<Backscatter> {
        if !(self.counts_per_db > 0.0) || !(range > 0.0) {
            return None;
        }

        let snr_db = self.snr_db(raw_count);
        if !(snr_db > SNR_FLOOR_DB) {
            return None;
        }

        let counts_linear = 10f64.powf(raw_count as f64 / self.counts_per_db / 10.0);
        let received = 10.0 * (counts_linear - self.noise_linear).log10();
        let common = received - self.source_level - self.pulse_volume_db
            + 2.0 * self.attenuation * range
            + self.gain;

        let spreading = 10.0 * range.log10();
        Some(Backscatter {
            sv: common - self.psi_db + 2.0 * spreading,
            ts: common + 4.0 * spreading + self.ts_gain,
            snr_db,
        })
    }
}
