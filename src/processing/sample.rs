// src/processing/sample.rs
use super::backscatter::{Backscatter, BackscatterTransform};
use super::geometry::GeometryMapper;
use crate::calibration::{BeamAcoustics, CalibrationConfig, CalibrationConstants};
use crate::packet::{AverageRecord, BurstRecord, DiveStart, FrequencyConfig};
use crate::types::BEAM_COUNT;
use chrono::{DateTime, Utc};

/// Packet a decoded sample came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SampleSource {
    /// 1-based burst number and the ping within the burst
    Burst { number: u32, ping: u8 },
    /// 1-based average packet number
    Average { number: u32 },
}

/// One raw sample with its calibration, geometry and backscatter applied
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodedSample {
    pub source: SampleSource,
    pub beam_id: u8,
    pub frequency_khz: i16,
    pub raw_count: i16,
    /// Scan within the ping for bursts, bin within the packet for averages
    pub scan_index: i32,
    /// Distance from the transducer, m; the centre of the bin for averages
    pub dz: f64,
    /// Depth, m
    pub z: f64,
    /// `None` when the sample is at or below the noise floor
    pub backscatter: Option<Backscatter>,
    pub dive_number: i16,
    pub pressure_raw: i16,
    /// Zonar clock of the enclosing packet, seconds
    pub zonar_time: i32,
    /// Glider clock at dive start, shifted by the Zonar clock's progress since the first packet
    pub dive_time: Option<DateTime<Utc>>,
}

impl DecodedSample {
    pub fn sv(&self) -> Option<f64> {
        self.backscatter.map(|b| b.sv)
    }

    pub fn ts(&self) -> Option<f64> {
        self.backscatter.map(|b| b.ts)
    }
}

/// Everything needed to calibrate the samples of one beam
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BeamCalibration {
    pub beam_id: u8,
    pub frequency: FrequencyConfig,
    pub constants: CalibrationConstants,
    pub acoustics: BeamAcoustics,
}

impl BeamCalibration {
    /// Join the calibration constants with the beam configurations of a dive
    pub fn for_dive(start: &DiveStart, config: &CalibrationConfig) -> [BeamCalibration; BEAM_COUNT] {
        let constants = config.build();
        let beam = |index: usize| {
            let frequency = start.frequencies[index];
            BeamCalibration {
                beam_id: index as u8 + 1,
                frequency,
                constants: constants[index],
                acoustics: BeamAcoustics::derive(&constants[index], frequency.nominal_freq_khz),
            }
        };
        [beam(0), beam(1)]
    }

    fn burst_mapper(&self) -> GeometryMapper {
        GeometryMapper::new(&self.frequency, &self.constants)
    }

    fn average_mapper(&self) -> GeometryMapper {
        let scans_per_bin = self.frequency.bin_count.max(1) as u32;
        GeometryMapper::with_scans_per_sample(&self.frequency, &self.constants, scans_per_bin)
    }

    fn transform(&self) -> BackscatterTransform {
        BackscatterTransform::new(&self.constants, &self.acoustics)
    }
}

fn beam_for(beams: &[BeamCalibration; BEAM_COUNT], beam_id: u8) -> Option<&BeamCalibration> {
    (beam_id as usize).checked_sub(1).and_then(|index| beams.get(index))
}

/// Build the sample table for a dive, in stream order
pub fn build_sample_table(
    start: &DiveStart,
    bursts: &[BurstRecord],
    averages: &[AverageRecord],
    beams: &[BeamCalibration; BEAM_COUNT],
) -> Vec<DecodedSample> {
    let total = bursts.iter().map(|b| b.samples.len()).sum::<usize>()
        + averages.iter().map(|a| a.samples.len()).sum::<usize>();
    let mut table = Vec::with_capacity(total);

    let reference_time = bursts
        .first()
        .map(|b| b.timestamp_epoch)
        .or_else(|| averages.first().map(|a| a.timestamp_epoch));
    let dive_time = |zonar_time: i32| {
        let elapsed = zonar_time as i64 - reference_time.unwrap_or(zonar_time) as i64;
        DateTime::from_timestamp(start.record.glider_epoch_seconds as i64 + elapsed, 0)
    };

    let (mut b, mut a) = (0, 0);
    while b < bursts.len() || a < averages.len() {
        let take_burst = match (bursts.get(b), averages.get(a)) {
            (Some(burst), Some(avg)) => burst.offset <= avg.offset,
            (Some(_), None) => true,
            _ => false,
        };

        if take_burst {
            let burst = &bursts[b];
            b += 1;
            let Some(beam) = beam_for(beams, burst.beam_id) else {
                continue;
            };
            let mapper = beam.burst_mapper();
            let transform = beam.transform();
            let time = dive_time(burst.timestamp_epoch);

            for (ordinal, (&raw, &ping)) in burst.samples.iter().zip(&burst.ping_index).enumerate() {
                let scan_index = burst.scan_index(ordinal) as i32;
                let geometry = mapper.map(scan_index, burst.pressure_raw);
                table.push(DecodedSample {
                    source: SampleSource::Burst { number: b as u32, ping },
                    beam_id: burst.beam_id,
                    frequency_khz: beam.frequency.nominal_freq_khz,
                    raw_count: raw,
                    scan_index,
                    dz: geometry.dz,
                    z: geometry.z,
                    backscatter: transform.apply(raw, geometry.dz),
                    dive_number: start.record.dive_number,
                    pressure_raw: burst.pressure_raw,
                    zonar_time: burst.timestamp_epoch,
                    dive_time: time,
                });
            }
        } else {
            let avg = &averages[a];
            a += 1;
            let Some(beam) = beam_for(beams, avg.beam_id) else {
                continue;
            };
            let mapper = beam.average_mapper();
            let transform = beam.transform();
            let time = dive_time(avg.timestamp_epoch);

            for (bin, &raw) in avg.samples.iter().enumerate() {
                let geometry = mapper.map(bin as i32, avg.pressure_raw);
                table.push(DecodedSample {
                    source: SampleSource::Average { number: a as u32 },
                    beam_id: avg.beam_id,
                    frequency_khz: beam.frequency.nominal_freq_khz,
                    raw_count: raw,
                    scan_index: bin as i32,
                    dz: geometry.dz,
                    z: geometry.z,
                    backscatter: transform.apply(raw, geometry.dz),
                    dive_number: start.record.dive_number,
                    pressure_raw: avg.pressure_raw,
                    zonar_time: avg.timestamp_epoch,
                    dive_time: time,
                });
            }
        }
    }

    table
}
