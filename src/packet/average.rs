// src/packet/average.rs
use super::expect_sync;
use crate::error::Result;
use crate::raw_data::ByteCursor;
use crate::types::beam_index;
use byteorder::{ByteOrder, LittleEndian};
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct AverageLayout {
    version: u8,
    beam: u8,
    bins: u8,
    pressure: [u8; 2],
    zonar_time: [u8; 4],
}

/// Bin-averaged scans on one beam
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AverageRecord {
    /// Offset of the sync byte in the dive file
    pub offset: usize,
    pub version: u8,
    pub beam_id: u8,
    /// Number of averaged bins, floor(total scans / scans per bin)
    pub bin_count: u8,
    /// Glider pressure, 1 LSB = 0.1 dbar
    pub pressure_raw: i16,
    pub timestamp_epoch: i32,
    pub samples: Vec<i16>,
    /// Word following the samples; carried through unchecked
    pub trailer: u16,
}

impl AverageRecord {
    pub const HEADER_SIZE: usize = 9;
    pub const TRAILER_SIZE: usize = 2;

    /// Decode an average body at the cursor
    pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let offset = expect_sync(cursor)?;

        let layout: AverageLayout = cursor.read_layout()?;
        beam_index(layout.beam, offset)?;

        let samples = cursor.read_i16_samples(layout.bins as usize)?;
        let trailer = cursor.read_u16()?;

        Ok(AverageRecord {
            offset,
            version: layout.version,
            beam_id: layout.beam,
            bin_count: layout.bins,
            pressure_raw: LittleEndian::read_i16(&layout.pressure),
            timestamp_epoch: LittleEndian::read_i32(&layout.zonar_time),
            samples,
            trailer,
        })
    }

    pub fn pressure_dbar(&self) -> f64 {
        self.pressure_raw as f64 / 10.0
    }
}
