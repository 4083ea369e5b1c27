// src/types.rs
use crate::error::{Result, ZonarError};
use std::fmt;

/// Packet type announced by a packet header for the packet that follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PacketType {
    /// Start-of-mission packet, reserved by the instrument and never populated
    Mission = 0xC0,
    /// Dive start: shared settings plus one configuration block per beam
    Start = 0xC1,
    /// End of dive, header only
    End = 0xC2,
    /// Full-resolution burst of pings
    Burst = 0xC3,
    /// Bin-averaged scans
    Average = 0xC4,
    /// End of file marker
    Eof = 0xFF,
}

impl PacketType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0xC0 => Some(PacketType::Mission),
            0xC1 => Some(PacketType::Start),
            0xC2 => Some(PacketType::End),
            0xC3 => Some(PacketType::Burst),
            0xC4 => Some(PacketType::Average),
            0xFF => Some(PacketType::Eof),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Whether the packet body opens with a sync byte
    pub fn has_sync(&self) -> bool {
        matches!(self, PacketType::Start | PacketType::Burst | PacketType::Average)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PacketType::Mission => "mission",
            PacketType::Start => "dive start",
            PacketType::End => "dive end",
            PacketType::Burst => "burst",
            PacketType::Average => "average",
            PacketType::Eof => "end of file",
        }
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Marker byte preceding every start, burst and average body
pub const SYNC_BYTE: u8 = 0xAA;

/// Number of acoustic channels carried in one dive file
pub const BEAM_COUNT: usize = 2;

/// Nominal pitch of the glider while the instrument pings, in degrees
pub const GLIDER_PITCH_DEG: f64 = 17.0;

/// Map a 1-based beam id from the stream onto an index into per-beam arrays.
pub fn beam_index(beam_id: u8, offset: usize) -> Result<usize> {
    match beam_id {
        1 | 2 => Ok(beam_id as usize - 1),
        _ => Err(ZonarError::InvalidBeam { offset, beam: beam_id }),
    }
}
