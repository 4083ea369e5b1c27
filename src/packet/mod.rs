// src/packet/mod.rs
//! Fixed binary layouts of the Zonar dive file
//!
//! A dive file is a sequence of packets. Each packet is a one-byte pad, an
//! 11-byte [`PacketHeader`] announcing the type of the *next* body, and then
//! that body. Start, burst and average bodies open with the sync byte `0xAA`.

mod average;
mod burst;
mod dive_start;
mod header;

pub use average::AverageRecord;
pub use burst::BurstRecord;
pub use dive_start::{DiveStart, DiveStartRecord, FrequencyConfig};
pub use header::PacketHeader;

use crate::error::{Result, ZonarError};
use crate::raw_data::ByteCursor;
use crate::types::SYNC_BYTE;

/// Consume the sync byte opening a body, returning its offset
fn expect_sync(cursor: &mut ByteCursor<'_>) -> Result<usize> {
    let offset = cursor.position();
    let found = cursor.read_u8()?;
    if found != SYNC_BYTE {
        return Err(ZonarError::BadSync { offset, found });
    }
    Ok(offset)
}

/// Convert a sample count field into a length, rejecting negative counts
fn sample_count(value: i64, offset: usize) -> Result<usize> {
    usize::try_from(value).map_err(|_| ZonarError::InvalidPacketLength { offset, length: value })
}
