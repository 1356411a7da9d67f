//! Dense trie tier
//!
//! The upper levels of the trie, where fanout is high relative to node
//! count, are stored as 256-bit bitmaps per node: one `labels` bit and one
//! `has_child` bit per possible byte, plus one `prefix_key` bit per node for
//! keys that end exactly at that node. Rank over the concatenated bitmaps
//! gives O(1) child stepping and key-ID computation.

use std::io::Write;

use crate::config::{KeyId, Level, FANOUT};
use crate::error::{FastrieError, Result};
use crate::io::{DataInput, DataOutput};
use crate::louds::Builder;
use crate::succinct::RankBitVector;

/// Outcome of a dense-tier traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenseResult {
    /// The key terminates in the dense tier; `level` is where its residual
    /// suffix starts.
    Found {
        /// Key identifier of the terminating edge
        key_id: KeyId,
        /// Byte offset at which the stored suffix begins
        level: Level,
    },
    /// Traversal consumed every dense level; continue in the sparse tier at
    /// this node.
    Descend {
        /// Global number of the sparse-tier node to continue from
        node_num: usize,
    },
    /// No edge matches the query.
    NotFound,
}

/// The dense (bitmap) tier of the trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoudsDense {
    height: usize,
    labels: RankBitVector,
    has_child: RankBitVector,
    prefix_key: RankBitVector,
}

impl LoudsDense {
    /// Assemble the dense tier from a finished builder.
    pub fn new(builder: &Builder) -> Self {
        let height = builder.sparse_start_level();
        Self {
            height,
            labels: RankBitVector::from_levels(builder.bitmap_labels()),
            has_child: RankBitVector::from_levels(builder.bitmap_has_child()),
            prefix_key: RankBitVector::from_levels(builder.prefixkey_indicator()),
        }
    }

    /// Walk the query through the dense levels.
    pub fn find_key(&self, key: &[u8]) -> DenseResult {
        let mut node_num = 0;
        for level in 0..self.height {
            if level >= key.len() {
                // query exhausted inside the dense tier
                if self.prefix_key.bit(node_num) {
                    return DenseResult::Found {
                        key_id: self.prefix_key_id(node_num),
                        level,
                    };
                }
                return DenseResult::NotFound;
            }
            let pos = node_num * FANOUT + key[level] as usize;
            if !self.labels.bit(pos) {
                return DenseResult::NotFound;
            }
            if !self.has_child.bit(pos) {
                // the edge terminates a key
                return DenseResult::Found {
                    key_id: self.leaf_key_id(pos, node_num),
                    level: level + 1,
                };
            }
            node_num = self.has_child.rank1(pos);
        }
        DenseResult::Descend { node_num }
    }

    /// Key ID of the leaf edge at bitmap position `pos` inside `node_num`.
    fn leaf_key_id(&self, pos: usize, node_num: usize) -> KeyId {
        (self.labels.rank1(pos) - self.has_child.rank1(pos) + self.prefix_key.rank1(node_num) - 1)
            as KeyId
    }

    /// Key ID of the prefix key ending at `node_num`. The node's bit 0 can
    /// never hold a label, so the inclusive rank at the node base counts
    /// exactly the leaf edges of earlier positions.
    fn prefix_key_id(&self, node_num: usize) -> KeyId {
        let pos = node_num * FANOUT;
        (self.labels.rank1(pos) - self.has_child.rank1(pos) + self.prefix_key.rank1(node_num) - 1)
            as KeyId
    }

    /// Number of dense levels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of dense nodes
    pub fn num_nodes(&self) -> usize {
        self.prefix_key.num_bits()
    }

    /// Number of set child bits, i.e. nodes whose parent is dense
    pub fn child_count(&self) -> usize {
        self.has_child.num_ones()
    }

    /// Number of keys terminating in the dense tier
    pub fn key_count(&self) -> usize {
        self.labels.num_ones() - self.has_child.num_ones() + self.prefix_key.num_ones()
    }

    /// Heap bytes held
    pub fn memory_usage(&self) -> usize {
        self.labels.memory_usage() + self.has_child.memory_usage() + self.prefix_key.memory_usage()
    }

    /// Bytes this tier occupies in the serialized stream
    pub fn serialized_size(&self) -> u64 {
        4 + self.labels.serialized_size()
            + self.has_child.serialized_size()
            + self.prefix_key.serialized_size()
    }

    /// Write to `out`
    pub fn save<O: DataOutput>(&self, out: &mut O) -> Result<()> {
        out.write_u32(self.height as u32)?;
        self.labels.save(out)?;
        self.has_child.save(out)?;
        self.prefix_key.save(out)
    }

    /// Read a tier previously written by [`save`](Self::save).
    pub fn load<I: DataInput>(input: &mut I) -> Result<Self> {
        let height = input.read_u32()? as usize;
        let labels = RankBitVector::load(input)?;
        let has_child = RankBitVector::load(input)?;
        let prefix_key = RankBitVector::load(input)?;
        if labels.num_bits() != has_child.num_bits()
            || labels.num_bits() != prefix_key.num_bits() * FANOUT
        {
            return Err(FastrieError::corrupt_index("dense bitmap sizes disagree"));
        }
        if (height == 0) != (prefix_key.num_bits() == 0) {
            return Err(FastrieError::corrupt_index("dense height without nodes"));
        }
        Ok(Self {
            height,
            labels,
            has_child,
            prefix_key,
        })
    }

    /// Dump the tier's structure for debugging.
    pub fn debug_print<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        writeln!(w, "-- Dense ({} levels, {} nodes) --", self.height, self.num_nodes())?;
        for node in 0..self.num_nodes() {
            write!(w, "node {}:", node)?;
            if self.prefix_key.bit(node) {
                write!(w, " <key>")?;
            }
            for c in 0..FANOUT {
                let pos = node * FANOUT + c;
                if self.labels.bit(pos) {
                    let marker = if self.has_child.bit(pos) { '+' } else { '.' };
                    match c as u8 {
                        c @ 0x21..=0x7e => write!(w, " {}{}", c as char, marker)?,
                        c => write!(w, " {:02x}{}", c, marker)?,
                    }
                }
            }
            writeln!(w)?;
        }
        Ok(())
    }
}
