// tests/common/mod.rs
#![allow(dead_code)]

use zonar_rs::{PacketType, SYNC_BYTE};

/// Beam configuration used by every synthetic dive: freq, pulse, blank, dt,
/// tScan, tPing, nScan, tWait, nBin, gn
pub const LOW_BEAM: [i16; 10] = [200, 6, 5, 1, 60, 80, 60, 5, 10, 40];
pub const HIGH_BEAM: [i16; 10] = [1000, 6, 5, 1, 60, 80, 60, 5, 10, 40];

/// Fields of a synthetic burst packet
#[derive(Debug, Clone)]
pub struct BurstFields {
    pub beam: u8,
    pub pings: u8,
    pub scans: i16,
    pub pressure: i16,
    pub time: i32,
    pub samples: Vec<i16>,
}

impl BurstFields {
    pub fn new(beam: u8, pings: u8, scans: i16, pressure: i16, time: i32, samples: &[i16]) -> Self {
        BurstFields {
            beam,
            pings,
            scans,
            pressure,
            time,
            samples: samples.to_vec(),
        }
    }
}

/// Builds dive files the way the instrument lays them out: every packet is a
/// pad byte, an 11-byte header, and the announced body.
#[derive(Default)]
pub struct DiveFileBuilder {
    data: Vec<u8>,
    /// Offset of each packet's pad byte
    packet_starts: Vec<usize>,
}

impl DiveFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, packet_type: u8, body_byte_count: i32) -> Self {
        self.packet_starts.push(self.data.len());
        self.data.extend_from_slice(&[0, 1, 11, packet_type]);
        self.data.extend_from_slice(&body_byte_count.to_le_bytes());
        self.data.extend_from_slice(&0i32.to_le_bytes());
        self
    }

    pub fn raw_packet(mut self, packet_type: u8, body: &[u8]) -> Self {
        self = self.header(packet_type, body.len() as i32);
        self.data.extend_from_slice(body);
        self
    }

    pub fn dive_start(self, dive: i16) -> Self {
        let mut body = vec![SYNC_BYTE, 1];
        body.extend_from_slice(&dive.to_le_bytes());
        body.extend_from_slice(&1000i32.to_le_bytes());
        body.extend_from_slice(&1000i32.to_le_bytes());
        body.extend_from_slice(&[4, 0]);
        body.extend_from_slice(&200i16.to_le_bytes());
        body.extend_from_slice(&100i16.to_le_bytes());
        body.extend_from_slice(&[0, 0]);
        for field in LOW_BEAM.iter().chain(HIGH_BEAM.iter()) {
            body.extend_from_slice(&field.to_le_bytes());
        }
        self.raw_packet(PacketType::Start.as_u8(), &body)
    }

    pub fn burst(self, fields: &BurstFields) -> Self {
        let mut body = vec![SYNC_BYTE, 1, fields.beam, fields.pings];
        body.extend_from_slice(&fields.scans.to_le_bytes());
        body.extend_from_slice(&fields.pressure.to_le_bytes());
        body.extend_from_slice(&fields.time.to_le_bytes());
        for sample in &fields.samples {
            body.extend_from_slice(&sample.to_le_bytes());
        }
        self.raw_packet(PacketType::Burst.as_u8(), &body)
    }

    pub fn average(self, beam: u8, pressure: i16, time: i32, samples: &[i16]) -> Self {
        let mut body = vec![SYNC_BYTE, 1, beam, samples.len() as u8];
        body.extend_from_slice(&pressure.to_le_bytes());
        body.extend_from_slice(&time.to_le_bytes());
        for sample in samples {
            body.extend_from_slice(&sample.to_le_bytes());
        }
        body.extend_from_slice(&[0, 0]);
        self.raw_packet(PacketType::Average.as_u8(), &body)
    }

    pub fn end(self) -> Self {
        self.header(PacketType::End.as_u8(), 0)
    }

    pub fn eof(self) -> Self {
        self.header(PacketType::Eof.as_u8(), 0)
    }

    pub fn packet_starts(&self) -> &[usize] {
        &self.packet_starts
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}
