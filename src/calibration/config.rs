// src/calibration/config.rs
use super::constants::CalibrationConstants;
use crate::error::{Result, ZonarError};
use crate::types::BEAM_COUNT;

/// Calibration values for both beams
///
/// Every array holds `[beam 1, beam 2]`. The defaults are the factory
/// values for the 200 kHz / 1000 kHz instrument and should be replaced with
/// the latest calibration for a deployment.
///
/// # Example
///
/// ```
/// use zonar_rs::CalibrationConfig;
///
/// let config = CalibrationConfig::default()
///     .with_gain([52.5, 53.0])
///     .with_sound_speed(1490.0);
///
/// let [low, high] = config.build();
/// assert_eq!(low.gain, 52.5);
/// assert_eq!(high.sound_speed, 1490.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CalibrationConfig {
    /// System gain, dB
    pub gain: [f64; BEAM_COUNT],
    /// Additional gain applied to target strength, dB
    pub ts_gain: [f64; BEAM_COUNT],
    /// Noise floor, dB
    pub noise: [f64; BEAM_COUNT],
    /// Noise measured during calibration, dB
    pub cal_noise: [f64; BEAM_COUNT],
    /// Source level, dB
    pub source_level: [f64; BEAM_COUNT],
    /// Transmit pulse duration, seconds
    pub pulse_duration_s: [f64; BEAM_COUNT],
    /// Full beam angle, degrees
    pub beam_angle_deg: [f64; BEAM_COUNT],
    /// Attenuation coefficient, dB/m
    pub attenuation: [f64; BEAM_COUNT],
    /// A/D counts per dB re 1 V
    pub counts_per_db: [f64; BEAM_COUNT],
    /// Sound speed in the surrounding water, m/s, shared by both beams
    pub sound_speed: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        CalibrationConfig {
            gain: [54.0, 54.0],
            ts_gain: [0.0, 0.0],
            noise: [27.0, 39.0],
            cal_noise: [31.0, 37.0],
            source_level: [103.0, 113.0],
            pulse_duration_s: [0.006, 0.006],
            beam_angle_deg: [9.8, 4.0],
            attenuation: [0.054, 0.38],
            counts_per_db: [40.0, 40.0],
            sound_speed: 1500.0,
        }
    }
}

impl CalibrationConfig {
    pub fn with_gain(mut self, value: [f64; BEAM_COUNT]) -> Self {
        self.gain = value;
        self
    }

    pub fn with_ts_gain(mut self, value: [f64; BEAM_COUNT]) -> Self {
        self.ts_gain = value;
        self
    }

    pub fn with_noise(mut self, value: [f64; BEAM_COUNT]) -> Self {
        self.noise = value;
        self
    }

    pub fn with_cal_noise(mut self, value: [f64; BEAM_COUNT]) -> Self {
        self.cal_noise = value;
        self
    }

    pub fn with_source_level(mut self, value: [f64; BEAM_COUNT]) -> Self {
        self.source_level = value;
        self
    }

    pub fn with_pulse_duration(mut self, seconds: [f64; BEAM_COUNT]) -> Self {
        self.pulse_duration_s = seconds;
        self
    }

    pub fn with_beam_angle(mut self, degrees: [f64; BEAM_COUNT]) -> Self {
        self.beam_angle_deg = degrees;
        self
    }

    pub fn with_attenuation(mut self, value: [f64; BEAM_COUNT]) -> Self {
        self.attenuation = value;
        self
    }

    pub fn with_counts_per_db(mut self, value: [f64; BEAM_COUNT]) -> Self {
        self.counts_per_db = value;
        self
    }

    pub fn with_sound_speed(mut self, metres_per_second: f64) -> Self {
        self.sound_speed = metres_per_second;
        self
    }

    /// Check the values the geometry and backscatter maths divide by or take logs of
    pub fn validate(&self) -> Result<()> {
        if !(self.sound_speed > 0.0) {
            return Err(ZonarError::InvalidCalibration(format!(
                "sound speed must be positive, got {}",
                self.sound_speed
            )));
        }

        for beam in 0..BEAM_COUNT {
            if !(self.counts_per_db[beam] > 0.0) {
                return Err(ZonarError::InvalidCalibration(format!(
                    "beam {}: counts per dB must be positive, got {}",
                    beam + 1,
                    self.counts_per_db[beam]
                )));
            }
            if !(self.pulse_duration_s[beam] > 0.0) {
                return Err(ZonarError::InvalidCalibration(format!(
                    "beam {}: pulse duration must be positive, got {}",
                    beam + 1,
                    self.pulse_duration_s[beam]
                )));
            }
            if !(self.beam_angle_deg[beam] > 0.0 && self.beam_angle_deg[beam] < 180.0) {
                return Err(ZonarError::InvalidCalibration(format!(
                    "beam {}: beam angle must be within (0, 180) degrees, got {}",
                    beam + 1,
                    self.beam_angle_deg[beam]
                )));
            }
        }

        Ok(())
    }

    /// Per-beam constants, with the beam angle converted to radians
    pub fn build(&self) -> [CalibrationConstants; BEAM_COUNT] {
        [self.beam(0), self.beam(1)]
    }

    fn beam(&self, index: usize) -> CalibrationConstants {
        CalibrationConstants {
            gain: self.gain[index],
            ts_gain: self.ts_gain[index],
            noise: self.noise[index],
            cal_noise: self.cal_noise[index],
            source_level: self.source_level[index],
            pulse_duration_s: self.pulse_duration_s[index],
            beam_angle_deg: self.beam_angle_deg[index],
            beam_angle_rad: self.beam_angle_deg[index].to_radians(),
            attenuation: self.attenuation[index],
            sound_speed: self.sound_speed,
            counts_per_db: self.counts_per_db[index],
        }
    }
}
