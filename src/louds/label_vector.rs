//! Edge labels of the sparse tier
//!
//! One byte per outgoing edge, concatenated across nodes in level order.
//! The edges of a single node are contiguous, so a label lookup is a linear
//! scan bounded by the node's fanout.

use crate::error::{FastrieError, Result};
use crate::io::{DataInput, DataOutput};

/// Flat byte array of sparse-tier edge labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelVector {
    labels: Vec<u8>,
}

impl LabelVector {
    /// Concatenate per-level label runs in order.
    pub fn from_levels(levels: &[Vec<u8>]) -> Self {
        let total = levels.iter().map(Vec::len).sum();
        let mut labels = Vec::with_capacity(total);
        for level in levels {
            labels.extend_from_slice(level);
        }
        Self { labels }
    }

    /// Label byte at `pos`
    #[inline]
    pub fn read(&self, pos: usize) -> Option<u8> {
        self.labels.get(pos).copied()
    }

    /// Search `size` contiguous edges starting at `start` for `label`,
    /// returning its absolute position.
    pub fn search(&self, label: u8, start: usize, size: usize) -> Option<usize> {
        if start >= self.labels.len() {
            return None;
        }
        let end = (start + size).min(self.labels.len());
        self.labels[start..end]
            .iter()
            .position(|&l| l == label)
            .map(|off| start + off)
    }

    /// Number of labels stored
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if no labels are stored
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Heap bytes held
    pub fn memory_usage(&self) -> usize {
        self.labels.len()
    }

    /// Bytes this structure occupies in the serialized stream
    pub fn serialized_size(&self) -> u64 {
        4 + self.labels.len() as u64
    }

    /// Write to `out`
    pub fn save<O: DataOutput>(&self, out: &mut O) -> Result<()> {
        out.write_u32(self.labels.len() as u32)?;
        out.write_bytes(&self.labels)
    }

    /// Read a vector previously written by [`save`](Self::save).
    pub fn load<I: DataInput>(input: &mut I) -> Result<Self> {
        let len = input.read_u32()? as usize;
        let labels = input.read_vec(len)?;
        if labels.len() != len {
            return Err(FastrieError::corrupt_index("label vector length"));
        }
        Ok(Self { labels })
    }
}
