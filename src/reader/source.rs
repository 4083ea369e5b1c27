// src/reader/source.rs
use super::dive::DiveDecode;
use super::session::DiveSessionDecoder;
use crate::calibration::CalibrationConfig;
use crate::error::Result;
use bytes::Bytes;
use log::debug;
use std::path::{Path, PathBuf};

#[cfg(feature = "mmap")]
use memmap2::Mmap;
#[cfg(feature = "mmap")]
use std::fs::File;

/// The bytes of one dive file, loaded whole
///
/// Dive files are small enough that the decoder works on a single in-memory
/// buffer. With the `mmap` feature the buffer can instead be a memory map of
/// the file.
#[derive(Debug, Clone)]
pub struct ByteSource {
    data: Bytes,
    path: Option<PathBuf>,
}

impl ByteSource {
    /// Read a dive file into memory
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        debug!("loaded {} bytes from {}", data.len(), path.display());

        Ok(ByteSource {
            data: Bytes::from(data),
            path: Some(path.to_path_buf()),
        })
    }

    /// Memory-map a dive file (requires "mmap" feature)
    #[cfg(feature = "mmap")]
    pub fn open_mmap(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        debug!("mapped {} bytes from {}", mmap.len(), path.display());

        Ok(ByteSource {
            data: Bytes::from_owner(mmap),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        ByteSource {
            data: data.into(),
            path: None,
        }
    }

    /// File the bytes came from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Shared handle to the underlying buffer
    pub fn bytes(&self) -> Bytes {
        self.data.clone()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Step-by-step decoder over these bytes
    pub fn session(&self) -> DiveSessionDecoder<'_> {
        DiveSessionDecoder::new(&self.data)
    }

    /// Decode and calibrate the whole dive
    ///
    /// `Err` only for a calibration that fails [`CalibrationConfig::validate`].
    pub fn decode(&self, config: &CalibrationConfig) -> Result<DiveDecode> {
        DiveDecode::decode(&self.data, config)
    }
}

impl From<Vec<u8>> for ByteSource {
    fn from(data: Vec<u8>) -> Self {
        ByteSource::from_bytes(data)
    }
}
