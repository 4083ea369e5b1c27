// src/packet/burst.rs
use super::{expect_sync, sample_count};
use crate::error::Result;
use crate::raw_data::ByteCursor;
use crate::types::beam_index;
use byteorder::{ByteOrder, LittleEndian};
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct BurstLayout {
    version: u8,
    beam: u8,
    pings: u8,
    scans: [u8; 2],
    pressure: [u8; 2],
    zonar_time: [u8; 4],
}

/// Full-resolution burst of pings on one beam
///
/// Samples are stored ping after ping: the first `scans_per_ping` values
/// belong to ping 0, the next `scans_per_ping` to ping 1, and so on.
/// `ping_index` runs parallel to `samples`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BurstRecord {
    /// Offset of the sync byte in the dive file
    pub offset: usize,
    pub version: u8,
    /// 1 for the 200 kHz beam, 2 for the 1000 kHz beam
    pub beam_id: u8,
    pub pings_in_burst: u8,
    pub scans_per_ping: i16,
    /// Glider pressure, 1 LSB = 0.1 dbar
    pub pressure_raw: i16,
    /// Zonar clock, seconds
    pub timestamp_epoch: i32,
    pub samples: Vec<i16>,
    pub ping_index: Vec<u8>,
}

impl BurstRecord {
    pub const HEADER_SIZE: usize = 11;

    /// Decode a burst body at the cursor
    pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let offset = expect_sync(cursor)?;

        let layout: BurstLayout = cursor.read_layout()?;
        beam_index(layout.beam, offset)?;

        let scans_per_ping = LittleEndian::read_i16(&layout.scans);
        let scans = sample_count(scans_per_ping as i64, offset)?;
        let total = layout.pings as usize * scans;

        let samples = cursor.read_i16_samples(total)?;
        let ping_index = (0..total).map(|ordinal| (ordinal / scans) as u8).collect();

        Ok(BurstRecord {
            offset,
            version: layout.version,
            beam_id: layout.beam,
            pings_in_burst: layout.pings,
            scans_per_ping,
            pressure_raw: LittleEndian::read_i16(&layout.pressure),
            timestamp_epoch: LittleEndian::read_i32(&layout.zonar_time),
            samples,
            ping_index,
        })
    }

    /// Samples grouped per ping
    pub fn pings(&self) -> impl Iterator<Item = &[i16]> {
        self.samples.chunks(self.scans_per_ping.max(1) as usize)
    }

    /// Scan index of a sample within its ping
    pub fn scan_index(&self, ordinal: usize) -> usize {
        ordinal % self.scans_per_ping.max(1) as usize
    }

    pub fn pressure_dbar(&self) -> f64 {
        self.pressure_raw as f64 / 10.0
    }
}
