// src/raw_data/cursor.rs
use crate::error::{Result, ZonarError};
use byteorder::{ByteOrder, LittleEndian};
use bytemuck::Pod;
use std::mem;

/// Forward-only cursor over the bytes of a dive file
///
/// Every read checks the remaining length first and fails with
/// [`ZonarError::TruncatedStream`] instead of panicking, so a short file
/// surfaces as a decode error at the exact offset where it ran out.
///
/// # Example
///
/// ```
/// use zonar_rs::raw_data::ByteCursor;
///
/// let data = [0xAA, 10, 0, 20, 0];
/// let mut cursor = ByteCursor::new(&data);
///
/// assert_eq!(cursor.read_u8().unwrap(), 0xAA);
/// assert_eq!(cursor.read_i16_samples(2).unwrap(), vec![10, 20]);
/// assert!(cursor.is_exhausted());
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, position: 0 }
    }

    /// Create a cursor already advanced to `position`
    pub fn at(data: &'a [u8], position: usize) -> Self {
        ByteCursor { data, position }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrow the next `count` bytes and advance past them
    pub fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if count > available {
            return Err(ZonarError::TruncatedStream {
                offset: self.position,
                needed: count,
                available,
            });
        }

        let start = self.position;
        self.position += count;
        Ok(&self.data[start..self.position])
    }

    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.take(count).map(|_| ())
    }

    pub fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    /// Read a fixed binary layout
    ///
    /// Layouts are byte-aligned plain-old-data structs, so this is a plain
    /// unaligned copy of `size_of::<T>()` bytes.
    pub fn read_layout<T: Pod>(&mut self) -> Result<T> {
        let bytes = self.take(mem::size_of::<T>())?;
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    /// Read `count` little-endian signed 16-bit samples
    pub fn read_i16_samples(&mut self, count: usize) -> Result<Vec<i16>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let bytes = self.take(count * 2)?;
        let mut samples = vec![0i16; count];
        LittleEndian::read_i16_into(bytes, &mut samples);
        Ok(samples)
    }
}
