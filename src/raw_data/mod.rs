// src/raw_data/mod.rs
//! Low-level access to the bytes of a dive file
//!
//! - [`ByteCursor`] - forward-only reads of bytes, fixed layouts and sample arrays
//!
//! # Example
//!
//! ```
//! use zonar_rs::raw_data::ByteCursor;
//!
//! // Two little-endian samples
//! let data = vec![0x10, 0x00, 0xF0, 0xFF];
//! let mut cursor = ByteCursor::new(&data);
//!
//! let samples = cursor.read_i16_samples(2).unwrap();
//! assert_eq!(samples, vec![16, -16]);
//! ```

mod cursor;

pub use cursor::ByteCursor;
