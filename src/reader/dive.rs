// src/reader/dive.rs
use super::session::{Diagnostic, DiveSessionDecoder, SessionRecords, SessionState};
use crate::calibration::CalibrationConfig;
use crate::error::{Result, ZonarError};
use crate::packet::{AverageRecord, BurstRecord, DiveStart};
use crate::processing::{build_sample_table, BeamCalibration, DecodedSample};
use crate::types::BEAM_COUNT;

/// A decoded, calibrated dive
///
/// Holds the packet records in stream order, the per-beam calibration, and
/// the sample table built from them. A decode that stopped on an error keeps
/// everything decoded before the error; [`DiveDecode::error`] says why it
/// stopped.
#[derive(Debug)]
pub struct DiveDecode {
    records: SessionRecords,
    beams: Option<[BeamCalibration; BEAM_COUNT]>,
    samples: Vec<DecodedSample>,
}

impl DiveDecode {
    /// Calibrate the records of a finished session
    ///
    /// Fails with [`ZonarError::InvalidCalibration`] when `config` does not
    /// validate; decode errors in the records themselves are not an `Err` here.
    pub fn new(records: SessionRecords, config: &CalibrationConfig) -> Result<Self> {
        let mut dive = DiveDecode {
            records,
            beams: None,
            samples: Vec::new(),
        };
        dive.recalibrate(config)?;
        Ok(dive)
    }

    pub fn decode(data: &[u8], config: &CalibrationConfig) -> Result<Self> {
        config.validate()?;
        Self::new(DiveSessionDecoder::new(data).run(), config)
    }

    /// Rebuild the sample table with other calibration constants
    ///
    /// Packet records are kept; only the derived values change. An invalid
    /// `config` leaves the current calibration in place.
    pub fn recalibrate(&mut self, config: &CalibrationConfig) -> Result<()> {
        config.validate()?;

        let Some(start) = self.records.dive_start.as_ref() else {
            self.beams = None;
            self.samples.clear();
            return Ok(());
        };

        let beams = BeamCalibration::for_dive(start, config);
        self.samples = build_sample_table(start, &self.records.bursts, &self.records.averages, &beams);
        self.beams = Some(beams);
        Ok(())
    }

    pub fn dive_start(&self) -> Option<&DiveStart> {
        self.records.dive_start.as_ref()
    }

    pub fn dive_number(&self) -> Option<i16> {
        self.dive_start().map(DiveStart::dive_number)
    }

    pub fn bursts(&self) -> &[BurstRecord] {
        &self.records.bursts
    }

    pub fn averages(&self) -> &[AverageRecord] {
        &self.records.averages
    }

    pub fn samples(&self) -> &[DecodedSample] {
        &self.samples
    }

    /// Samples of one beam, in stream order
    pub fn beam_samples(&self, beam_id: u8) -> impl Iterator<Item = &DecodedSample> {
        self.samples.iter().filter(move |s| s.beam_id == beam_id)
    }

    pub fn beams(&self) -> Option<&[BeamCalibration; BEAM_COUNT]> {
        self.beams.as_ref()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.records.diagnostics
    }

    pub fn state(&self) -> SessionState {
        self.records.state
    }

    pub fn error(&self) -> Option<&ZonarError> {
        self.records.error.as_ref()
    }

    /// True when the decode reached the end of the stream without error
    pub fn is_complete(&self) -> bool {
        self.records.state == SessionState::Eof
    }

    /// Bytes of the dive file consumed
    pub fn bytes_consumed(&self) -> usize {
        self.records.position
    }

    pub fn records(&self) -> &SessionRecords {
        &self.records
    }

    pub fn into_records(self) -> SessionRecords {
        self.records
    }
}

/// Decode and calibrate one dive file held in memory
///
/// # Example
///
/// ```
/// use zonar_rs::{decode_dive, CalibrationConfig};
///
/// let dive = decode_dive(&[], &CalibrationConfig::default()).unwrap();
/// assert!(dive.is_complete());
/// assert!(dive.samples().is_empty());
///
/// let bad = CalibrationConfig::default().with_beam_angle([0.0, 4.0]);
/// assert!(decode_dive(&[], &bad).is_err());
/// ```
pub fn decode_dive(data: &[u8], config: &CalibrationConfig) -> Result<DiveDecode> {
    DiveDecode::decode(data, config)
}
