// src/packet/header.rs
use crate::error::Result;
use crate::raw_data::ByteCursor;
use crate::types::PacketType;
use byteorder::{ByteOrder, LittleEndian};
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct HeaderLayout {
    version: u8,
    header_size: u8,
    next_packet_type: u8,
    body_byte_count: [u8; 4],
    checksum: [u8; 4],
}

/// Packet wrapper announcing the packet that follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PacketHeader {
    /// Offset of the header's first byte in the dive file
    pub offset: usize,
    pub software_version: u8,
    pub header_size: u8,
    pub next_packet_type: u8,
    pub body_byte_count: i32,
    /// Decoded but never verified against the body
    pub checksum: i32,
}

impl PacketHeader {
    pub const SIZE: usize = 11;
    /// Pad byte the instrument leaves in front of every header
    pub const LEAD_IN: usize = 1;

    /// Decode a header at the cursor and advance past it
    pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let offset = cursor.position();
        let layout: HeaderLayout = cursor.read_layout()?;

        Ok(PacketHeader {
            offset,
            software_version: layout.version,
            header_size: layout.header_size,
            next_packet_type: layout.next_packet_type,
            body_byte_count: LittleEndian::read_i32(&layout.body_byte_count),
            checksum: LittleEndian::read_i32(&layout.checksum),
        })
    }

    /// Decode the header at `position`, returning the announced packet type,
    /// the position just past the header, and the header itself.
    pub fn decode_at(data: &[u8], position: usize) -> Result<(u8, usize, Self)> {
        let mut cursor = ByteCursor::at(data, position);
        let header = Self::decode(&mut cursor)?;
        Ok((header.next_packet_type, cursor.position(), header))
    }

    /// The announced packet type, or `None` when the byte is not one the format defines
    pub fn packet_type(&self) -> Option<PacketType> {
        PacketType::from_u8(self.next_packet_type)
    }
}
