// src/processing/geometry.rs
use crate::calibration::CalibrationConstants;
use crate::packet::FrequencyConfig;
use crate::types::GLIDER_PITCH_DEG;

/// Range and depth of one sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    /// Distance from the transducer, m
    pub dz: f64,
    /// Depth, m (pressure in dbar taken as depth)
    pub z: f64,
}

/// Maps scan indices of one beam onto range and depth
///
/// The first scan is centred half a pulse after the blanking period ends.
/// Each further scan adds one scan period of two-way travel time. A sample
/// that spans several scans sits at the centre of its span. Depth adds the
/// range projected along the glider's fixed pitch to the pressure depth.
#[derive(Debug, Clone, Copy)]
pub struct GeometryMapper {
    first_sample_m: f64,
    sample_step_m: f64,
    pitch_cos: f64,
}

impl GeometryMapper {
    /// Mapper for full-resolution burst scans
    pub fn new(frequency: &FrequencyConfig, constants: &CalibrationConstants) -> Self {
        Self::with_scans_per_sample(frequency, constants, 1)
    }

    /// Mapper for samples that each span `scans_per_sample` consecutive scans
    ///
    /// Sample `i` covers scans `i * n .. (i + 1) * n` and is placed at scan
    /// `i * n + (n - 1) / 2`.
    pub fn with_scans_per_sample(
        frequency: &FrequencyConfig,
        constants: &CalibrationConstants,
        scans_per_sample: u32,
    ) -> Self {
        // metres of range per millisecond of two-way travel
        let metres_per_ms = constants.sound_speed / 2.0 / 1000.0;
        let first_scan_m =
            (frequency.blank_ms as f64 + constants.pulse_duration_s * 1000.0 / 2.0) * metres_per_ms;
        let scan_step_m = metres_per_ms * frequency.scan_period_us as f64 * 0.001;
        let scans = scans_per_sample.max(1) as f64;

        GeometryMapper {
            first_sample_m: first_scan_m + scan_step_m * (scans - 1.0) / 2.0,
            sample_step_m: scan_step_m * scans,
            pitch_cos: GLIDER_PITCH_DEG.to_radians().cos(),
        }
    }

    /// Range of sample 0
    pub fn first_sample_range(&self) -> f64 {
        self.first_sample_m
    }

    pub fn map(&self, sample_index: i32, pressure_raw: i16) -> Geometry {
        let dz = self.first_sample_m + sample_index as f64 * self.sample_step_m;
        let zb = pressure_raw as f64 / 10.0;
        Geometry {
            dz,
            z: zb + dz * self.pitch_cos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationConfig;

    fn frequency(blank_ms: i16, scan_period_us: i16) -> FrequencyConfig {
        FrequencyConfig {
            nominal_freq_khz: 200,
            pulse_duration_ms: 6,
            blank_ms,
            scan_period_us,
            scan_window_ms: 60,
            ping_interval_ms: 80,
            scan_count: 60,
            wait_ms: 5,
            bin_count: 10,
            counts_per_db: 40,
        }
    }

    #[test]
    fn test_first_scan_range() {
        let [low, _] = CalibrationConfig::default().build();
        let mapper = GeometryMapper::new(&frequency(5, 1), &low);

        // (5 ms + 3 ms) * 1500 / 2 / 1000
        assert!((mapper.first_sample_range() - 6.0).abs() < 1e-12);
        let geometry = mapper.map(0, 0);
        assert!((geometry.dz - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_scan_spacing() {
        let [low, _] = CalibrationConfig::default().build();
        let mapper = GeometryMapper::new(&frequency(5, 200), &low);

        // 200 us scans at 1500 m/s are 0.15 m apart
        let a = mapper.map(10, 0);
        let b = mapper.map(11, 0);
        assert!((b.dz - a.dz - 0.15).abs() < 1e-12);
        assert!((a.dz - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_depth_uses_pressure_and_pitch() {
        let [low, _] = CalibrationConfig::default().build();
        let mapper = GeometryMapper::new(&frequency(5, 1), &low);

        let geometry = mapper.map(0, 50);
        let expected = 5.0 + 6.0 * (17.0f64).to_radians().cos();
        assert!((geometry.z - expected).abs() < 1e-12);
    }

    #[test]
    fn test_binned_samples_span_several_scans() {
        let [low, _] = CalibrationConfig::default().build();
        let config = frequency(5, 200);
        let scan = GeometryMapper::new(&config, &low);
        let bin = GeometryMapper::with_scans_per_sample(&config, &low, 10);

        // bin 0 covers scans 0..10, centred between scans 4 and 5
        let centre = (scan.map(4, 0).dz + scan.map(5, 0).dz) / 2.0;
        assert!((bin.map(0, 0).dz - centre).abs() < 1e-12);
        assert!((bin.map(1, 0).dz - bin.map(0, 0).dz - (scan.map(10, 0).dz - scan.map(0, 0).dz)).abs() < 1e-12);
        assert!(bin.first_sample_range() > scan.first_sample_range());
    }

    #[test]
    fn test_single_scan_bins_match_scans() {
        let [low, _] = CalibrationConfig::default().build();
        let config = frequency(5, 200);
        let scan = GeometryMapper::new(&config, &low);
        let bin = GeometryMapper::with_scans_per_sample(&config, &low, 1);
        assert_eq!(scan.map(7, 30), bin.map(7, 30));
    }

    #[test]
    fn test_sound_speed_scales_range() {
        let slow = CalibrationConfig::default().with_sound_speed(1000.0).build()[0];
        let fast = CalibrationConfig::default().with_sound_speed(2000.0).build()[0];
        let config = frequency(5, 200);

        let a = GeometryMapper::new(&config, &slow).map(20, 0);
        let b = GeometryMapper::new(&config, &fast).map(20, 0);
        assert!((b.dz - 2.0 * a.dz).abs() < 1e-9);
    }
}
