//! Data output abstractions and implementations
//!
//! Provides a trait for writing the fixed-width little-endian primitives the
//! serialized index is made of, with implementations for byte vectors and
//! arbitrary `std::io::Write` destinations.

use std::io::Write;

use crate::error::Result;

/// Trait for writing structured data to a destination
pub trait DataOutput {
    /// Write a single byte
    fn write_u8(&mut self, value: u8) -> Result<()>;

    /// Write a 32-bit unsigned integer in little-endian format
    fn write_u32(&mut self, value: u32) -> Result<()>;

    /// Write a 64-bit unsigned integer in little-endian format
    fn write_u64(&mut self, value: u64) -> Result<()>;

    /// Write bytes from the provided buffer
    fn write_bytes(&mut self, data: &[u8]) -> Result<()>;

    /// Flush any buffered data to the underlying destination
    fn flush(&mut self) -> Result<()>;
}

/// DataOutput implementation backed by a `Vec<u8>`
pub struct VecDataOutput {
    data: Vec<u8>,
}

impl VecDataOutput {
    /// Create a new empty VecDataOutput
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create a new VecDataOutput with the specified initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Get the number of bytes written
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if no bytes have been written
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a reference to the underlying data
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Convert into the underlying `Vec<u8>`
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl Default for VecDataOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl DataOutput for VecDataOutput {
    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.data.push(value);
        Ok(())
    }

    fn write_u32(&mut self, value: u32) -> Result<()> {
        self.data.extend_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn write_u64(&mut self, value: u64) -> Result<()> {
        self.data.extend_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.data.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// DataOutput implementation for `std::io::Write` types
pub struct WriterDataOutput<W> {
    writer: W,
    bytes_written: u64,
}

impl<W: Write> WriterDataOutput<W> {
    /// Create a new WriterDataOutput from a Write type
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            bytes_written: 0,
        }
    }

    /// Get the number of bytes written
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Convert back to the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DataOutput for WriterDataOutput<W> {
    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.writer.write_all(&[value])?;
        self.bytes_written += 1;
        Ok(())
    }

    fn write_u32(&mut self, value: u32) -> Result<()> {
        self.writer.write_all(&value.to_le_bytes())?;
        self.bytes_written += 4;
        Ok(())
    }

    fn write_u64(&mut self, value: u64) -> Result<()> {
        self.writer.write_all(&value.to_le_bytes())?;
        self.bytes_written += 8;
        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.bytes_written += data.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
