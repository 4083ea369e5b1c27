// src/packet/dive_start.rs
use super::expect_sync;
use crate::error::Result;
use crate::raw_data::ByteCursor;
use crate::types::BEAM_COUNT;
use byteorder::{ByteOrder, LittleEndian};
use bytemuck::{Pod, Zeroable};
use chrono::{DateTime, Utc};

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct DiveStartLayout {
    version: u8,
    dive_number: [u8; 2],
    glider_time: [u8; 4],
    zonar_time: [u8; 4],
    pings_per_burst: u8,
    burst_interval: u8,
    warmup: [u8; 2],
    bin_average: [u8; 2],
    barker: u8,
    barker_bits: u8,
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct FrequencyLayout {
    frequency: [u8; 2],
    pulse: [u8; 2],
    blank: [u8; 2],
    scan_period: [u8; 2],
    scan_window: [u8; 2],
    ping_interval: [u8; 2],
    scan_count: [u8; 2],
    wait: [u8; 2],
    bin_count: [u8; 2],
    counts_per_db: [u8; 2],
}

/// Settings shared by both beams for one dive
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiveStartRecord {
    pub version: u8,
    /// Dive number assigned by the glider
    pub dive_number: i16,
    /// Glider clock at dive start, Unix seconds
    pub glider_epoch_seconds: i32,
    /// Zonar clock at dive start, seconds
    pub zonar_epoch_seconds: i32,
    pub pings_per_burst: u8,
    /// Seconds between bursts in continuous mode
    pub burst_interval_seconds: u8,
    /// Electronics warm-up before transmit
    pub warmup_ms: i16,
    /// Averaging time per bin
    pub bin_average_ms: i16,
    pub use_barker_code: bool,
    pub barker_bits: u8,
}

impl DiveStartRecord {
    pub const SIZE: usize = 19;

    /// Glider clock at dive start as a UTC timestamp
    pub fn glider_start_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.glider_epoch_seconds as i64, 0)
    }
}

/// Acquisition settings for one beam
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrequencyConfig {
    pub nominal_freq_khz: i16,
    /// Transmit pulse duration
    pub pulse_duration_ms: i16,
    /// Time between end of transmit and the first scan
    pub blank_ms: i16,
    /// Period between A/D scans in microseconds (200 gives a 5 kHz sample rate)
    pub scan_period_us: i16,
    /// Time spent taking scans
    pub scan_window_ms: i16,
    pub ping_interval_ms: i16,
    /// Number of A/D scans per ping
    pub scan_count: i16,
    /// Idle time before the next ping
    pub wait_ms: i16,
    /// Scans averaged into each bin of an average packet
    pub bin_count: i16,
    /// A/D counts per dB re 1 V
    pub counts_per_db: i16,
}

impl FrequencyConfig {
    pub const SIZE: usize = 20;

    fn from_layout(layout: &FrequencyLayout) -> Self {
        FrequencyConfig {
            nominal_freq_khz: LittleEndian::read_i16(&layout.frequency),
            pulse_duration_ms: LittleEndian::read_i16(&layout.pulse),
            blank_ms: LittleEndian::read_i16(&layout.blank),
            scan_period_us: LittleEndian::read_i16(&layout.scan_period),
            scan_window_ms: LittleEndian::read_i16(&layout.scan_window),
            ping_interval_ms: LittleEndian::read_i16(&layout.ping_interval),
            scan_count: LittleEndian::read_i16(&layout.scan_count),
            wait_ms: LittleEndian::read_i16(&layout.wait),
            bin_count: LittleEndian::read_i16(&layout.bin_count),
            counts_per_db: LittleEndian::read_i16(&layout.counts_per_db),
        }
    }
}

/// Decoded dive start packet: the shared record and both beam configurations
///
/// Beam 1 (the 200 kHz channel) always comes first, beam 2 (1000 kHz) second.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiveStart {
    pub offset: usize,
    pub record: DiveStartRecord,
    pub frequencies: [FrequencyConfig; BEAM_COUNT],
}

impl DiveStart {
    /// Sync byte, the start record, and one configuration block per beam
    pub const BODY_SIZE: usize = 1 + DiveStartRecord::SIZE + BEAM_COUNT * FrequencyConfig::SIZE;

    /// Decode a dive start body at the cursor
    pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let offset = expect_sync(cursor)?;

        let layout: DiveStartLayout = cursor.read_layout()?;
        let record = DiveStartRecord {
            version: layout.version,
            dive_number: LittleEndian::read_i16(&layout.dive_number),
            glider_epoch_seconds: LittleEndian::read_i32(&layout.glider_time),
            zonar_epoch_seconds: LittleEndian::read_i32(&layout.zonar_time),
            pings_per_burst: layout.pings_per_burst,
            burst_interval_seconds: layout.burst_interval,
            warmup_ms: LittleEndian::read_i16(&layout.warmup),
            bin_average_ms: LittleEndian::read_i16(&layout.bin_average),
            use_barker_code: layout.barker != 0,
            barker_bits: layout.barker_bits,
        };

        let first: FrequencyLayout = cursor.read_layout()?;
        let second: FrequencyLayout = cursor.read_layout()?;

        Ok(DiveStart {
            offset,
            record,
            frequencies: [
                FrequencyConfig::from_layout(&first),
                FrequencyConfig::from_layout(&second),
            ],
        })
    }

    pub fn dive_number(&self) -> i16 {
        self.record.dive_number
    }

    /// Configuration for a zero-based beam index
    pub fn frequency(&self, index: usize) -> Option<&FrequencyConfig> {
        self.frequencies.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ZonarError;
    use crate::test_helpers::{dive_start_body, frequency_block};

    #[test]
    fn test_layout_sizes() {
        assert_eq!(std::mem::size_of::<DiveStartLayout>(), DiveStartRecord::SIZE);
        assert_eq!(std::mem::size_of::<FrequencyLayout>(), FrequencyConfig::SIZE);
        assert_eq!(DiveStart::BODY_SIZE, 60);
    }

    #[test]
    fn test_decode_dive_start() {
        let data = dive_start_body(7);
        let mut cursor = ByteCursor::new(&data);

        let start = DiveStart::decode(&mut cursor).unwrap();
        assert_eq!(cursor.position(), DiveStart::BODY_SIZE);
        assert_eq!(start.offset, 0);
        assert_eq!(start.dive_number(), 7);
        assert_eq!(start.record.glider_epoch_seconds, 1000);
        assert_eq!(start.record.zonar_epoch_seconds, 1000);
        assert_eq!(start.record.pings_per_burst, 4);
        assert_eq!(start.record.burst_interval_seconds, 0);
        assert_eq!(start.record.warmup_ms, 200);
        assert_eq!(start.record.bin_average_ms, 100);
        assert!(!start.record.use_barker_code);
        assert_eq!(start.record.barker_bits, 0);

        let low = start.frequency(0).unwrap();
        assert_eq!(low.nominal_freq_khz, 200);
        assert_eq!(low.pulse_duration_ms, 6);
        assert_eq!(low.blank_ms, 5);
        assert_eq!(low.scan_period_us, 1);
        assert_eq!(low.scan_window_ms, 60);
        assert_eq!(low.ping_interval_ms, 80);
        assert_eq!(low.scan_count, 60);
        assert_eq!(low.wait_ms, 5);
        assert_eq!(low.bin_count, 10);
        assert_eq!(low.counts_per_db, 40);

        assert_eq!(start.frequency(1).unwrap().nominal_freq_khz, 1000);
        assert!(start.frequency(2).is_none());
    }

    #[test]
    fn test_frequency_block_field_order() {
        let data = frequency_block([1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        let layout: FrequencyLayout = ByteCursor::new(&data).read_layout().unwrap();
        let config = FrequencyConfig::from_layout(&layout);
        assert_eq!(config.nominal_freq_khz, 1);
        assert_eq!(config.scan_period_us, 4);
        assert_eq!(config.bin_count, 9);
        assert_eq!(config.counts_per_db, 10);
    }

    #[test]
    fn test_bad_sync() {
        let mut data = dive_start_body(7);
        data[0] = 0x55;

        match DiveStart::decode(&mut ByteCursor::new(&data)) {
            Err(ZonarError::BadSync { offset, found }) => {
                assert_eq!(offset, 0);
                assert_eq!(found, 0x55);
            }
            other => panic!("Expected BadSync, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_second_beam_is_truncated() {
        let data = dive_start_body(7);
        let short = &data[..DiveStart::BODY_SIZE - 5];

        let err = DiveStart::decode(&mut ByteCursor::new(short)).unwrap_err();
        assert!(matches!(err, ZonarError::TruncatedStream { .. }));
    }

    #[test]
    fn test_glider_start_time() {
        let data = dive_start_body(7);
        let start = DiveStart::decode(&mut ByteCursor::new(&data)).unwrap();
        let time = start.record.glider_start_time().unwrap();
        assert_eq!(time.timestamp(), 1000);
    }
}
