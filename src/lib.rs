// src/lib.rs
//! # zonar-rs
//!
//! Decoder for the binary dive files written by the Zonar active sonar
//! carried on Spray ocean gliders.
//!
//! A Zonar pings two beams (200 kHz and 1000 kHz) during each dive and logs
//! the raw echo counts to one file per dive. This crate walks the packet
//! stream of such a file, decodes the dive start, burst and average packets,
//! and turns every raw count into a calibrated sample with its range, depth
//! and backscatter (Sv and TS).
//!
//! ## Features
//!
//! - **Single pass**: one forward walk over an in-memory buffer, no seeking
//! - **Partial results**: a corrupt or truncated file still yields everything
//!   decoded before the damage, with the reason decoding stopped
//! - **Recalibration**: derived values can be rebuilt with new constants
//!   without decoding the file again
//! - **Batch decoding**: many dive files decoded on a pool of threads
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zonar_rs::*;
//!
//! fn main() -> Result<()> {
//!     let source = ByteSource::open("dive0042.dat")?;
//!     let config = CalibrationConfig::default().with_gain([52.5, 53.0]);
//!
//!     let dive = source.decode(&config)?;
//!     if let Some(err) = dive.error() {
//!         eprintln!("partial decode: {}", err);
//!     }
//!
//!     for sample in dive.samples() {
//!         if let Some(sv) = sample.sv() {
//!             println!("beam {} z={:.1} m Sv={:.1} dB", sample.beam_id, sample.z, sv);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Stepping Through a File
//!
//! ```rust
//! use zonar_rs::{DecodeOutcome, DiveSessionDecoder};
//!
//! let data: Vec<u8> = Vec::new();
//! let mut decoder = DiveSessionDecoder::new(&data);
//! while let DecodeOutcome::Continue(position) = decoder.step() {
//!     println!("at byte {}", position);
//! }
//! ```

// Modules
pub mod error;
pub mod types;
pub mod packet;
pub mod raw_data;
pub mod calibration;
pub mod processing;
pub mod reader;

// Re-export commonly used types at the crate root for convenience
pub use error::{ErrorKind, Result, ZonarError};

// Type exports
pub use types::{PacketType, BEAM_COUNT, GLIDER_PITCH_DEG, SYNC_BYTE};

// Packet exports
pub use packet::{
    AverageRecord,
    BurstRecord,
    DiveStart,
    DiveStartRecord,
    FrequencyConfig,
    PacketHeader,
};

// Calibration exports
pub use calibration::{
    BeamAcoustics,
    CalibrationConfig,
    CalibrationConstants,
};

// Processing exports
pub use processing::{
    Backscatter,
    BeamCalibration,
    DecodedSample,
    Geometry,
    SampleSource,
};

// Reader exports
pub use reader::{
    decode_dive,
    BatchDecoder,
    ByteSource,
    DecodeOutcome,
    Diagnostic,
    DiagnosticKind,
    DiveDecode,
    DiveSessionDecoder,
    SessionState,
};

// Prelude module for glob imports
pub mod prelude {
    //! Convenient imports for common use cases.
    //!
    //! ```rust
    //! use zonar_rs::prelude::*;
    //! ```

    pub use crate::calibration::CalibrationConfig;
    pub use crate::error::{Result, ZonarError};
    pub use crate::processing::DecodedSample;
    pub use crate::reader::{decode_dive, ByteSource, DiveDecode};
}

// Version information
/// The library version
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::StreamBuilder;

    #[test]
    fn test_version_constant() {
        assert!(!LIBRARY_VERSION.is_empty());
    }

    #[test]
    fn test_packet_type_codes() {
        assert_eq!(PacketType::from_u8(0xC1), Some(PacketType::Start));
        assert_eq!(PacketType::from_u8(0xC3), Some(PacketType::Burst));
        assert_eq!(PacketType::from_u8(0xC4), Some(PacketType::Average));
        assert_eq!(PacketType::from_u8(0xFF), Some(PacketType::Eof));
        assert_eq!(PacketType::from_u8(0x42), None);
        assert_eq!(PacketType::Burst.as_u8(), 0xC3);
    }

    #[test]
    fn test_body_sizes() {
        assert_eq!(PacketHeader::SIZE, 11);
        assert_eq!(DiveStart::BODY_SIZE, 60);
        assert_eq!(BurstRecord::HEADER_SIZE, 11);
        assert_eq!(AverageRecord::HEADER_SIZE, 9);
    }

    #[test]
    fn test_stream_builder_layout() {
        let data = StreamBuilder::new().dive_start(1).eof().build();
        // pad, header, start body, pad, header
        assert_eq!(data.len(), 1 + 11 + 60 + 1 + 11);
        assert_eq!(data[1 + 11], SYNC_BYTE);
        assert_eq!(data[1 + 11 + 60 + 1 + 2], 0xFF);
    }

    #[test]
    fn test_decode_through_prelude() {
        use crate::prelude::*;

        let data = StreamBuilder::new()
            .dive_start(9)
            .average(2, 100, 77, &[3000, 3000, 3000])
            .eof()
            .build();
        let dive: DiveDecode = decode_dive(&data, &CalibrationConfig::default()).unwrap();
        assert!(dive.is_complete());
        assert_eq!(dive.averages().len(), 1);
        assert_eq!(dive.samples().len(), 3);
        assert!(dive.samples().iter().all(|s| s.frequency_khz == 1000));
    }
}
