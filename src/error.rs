// src/error.rs
use crate::types::PacketType;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZonarError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Bad sync byte at offset {offset}: expected 0xAA, found {found:#04x}")]
    BadSync { offset: usize, found: u8 },

    #[error("Unknown packet type {packet_type:#04x} at offset {offset}")]
    UnknownPacketType { offset: usize, packet_type: u8 },

    #[error("Truncated stream at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedStream { offset: usize, needed: usize, available: usize },

    #[error("{packet} packet at offset {offset} arrived before the dive start packet")]
    MissingDiveStart { offset: usize, packet: PacketType },

    #[error("Invalid beam id {beam} at offset {offset} (expected 1 or 2)")]
    InvalidBeam { offset: usize, beam: u8 },

    #[error("Invalid packet length {length} at offset {offset}")]
    InvalidPacketLength { offset: usize, length: i64 },

    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),
}

/// Coarse classification of a [`ZonarError`], cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Io,
    BadSync,
    UnknownPacketType,
    TruncatedStream,
    MissingDiveStart,
    InvalidBeam,
    InvalidPacketLength,
    InvalidCalibration,
}

impl ZonarError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ZonarError::Io(_) => ErrorKind::Io,
            ZonarError::BadSync { .. } => ErrorKind::BadSync,
            ZonarError::UnknownPacketType { .. } => ErrorKind::UnknownPacketType,
            ZonarError::TruncatedStream { .. } => ErrorKind::TruncatedStream,
            ZonarError::MissingDiveStart { .. } => ErrorKind::MissingDiveStart,
            ZonarError::InvalidBeam { .. } => ErrorKind::InvalidBeam,
            ZonarError::InvalidPacketLength { .. } => ErrorKind::InvalidPacketLength,
            ZonarError::InvalidCalibration(_) => ErrorKind::InvalidCalibration,
        }
    }

    /// Only unknown packet types can be stepped over; everything else ends a dive decode.
    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::UnknownPacketType
    }

    /// Byte offset in the dive file where the error was detected, if it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ZonarError::BadSync { offset, .. }
            | ZonarError::UnknownPacketType { offset, .. }
            | ZonarError::TruncatedStream { offset, .. }
            | ZonarError::MissingDiveStart { offset, .. }
            | ZonarError::InvalidBeam { offset, .. }
            | ZonarError::InvalidPacketLength { offset, .. } => Some(*offset),
            ZonarError::Io(_) | ZonarError::InvalidCalibration(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ZonarError>;
