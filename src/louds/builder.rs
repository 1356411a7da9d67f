//! Level-order trie builder
//!
//! Walks the sorted key list once and emits, per level, the edge labels,
//! child-indicator bits, LOUDS node-boundary bits, and suffix counts the
//! dense and sparse tiers are assembled from. Keys must arrive sorted
//! ascending; adjacent duplicates are skipped.

use crate::config::{FANOUT, TERMINATOR};
use crate::error::{FastrieError, Result};
use crate::succinct::BitVector;

/// Builds the per-level vectors of the trie from a sorted key list.
///
/// A key contributes one edge per level down to the byte that distinguishes
/// it from both neighbors; everything past that byte becomes its suffix. A
/// key that is a strict prefix of its successor (or is empty) instead ends
/// in a [`TERMINATOR`] edge one level below its last byte.
pub struct Builder {
    include_dense: bool,
    sparse_dense_ratio: u32,

    // sparse format, one slot per edge, per level
    labels: Vec<Vec<u8>>,
    child_indicator: Vec<BitVector>,
    louds: Vec<BitVector>,

    // dense format, filled for levels below the cutoff
    bitmap_labels: Vec<BitVector>,
    bitmap_has_child: Vec<BitVector>,
    prefixkey_indicator: Vec<BitVector>,

    node_counts: Vec<usize>,
    suffix_counts: Vec<usize>,
    sparse_start_level: usize,
}

impl Builder {
    /// Create a builder with the given dense-tier settings.
    pub fn new(include_dense: bool, sparse_dense_ratio: u32) -> Self {
        Self {
            include_dense,
            sparse_dense_ratio,
            labels: Vec::new(),
            child_indicator: Vec::new(),
            louds: Vec::new(),
            bitmap_labels: Vec::new(),
            bitmap_has_child: Vec::new(),
            prefixkey_indicator: Vec::new(),
            node_counts: Vec::new(),
            suffix_counts: Vec::new(),
            sparse_start_level: 0,
        }
    }

    /// Consume the sorted key list and fill every per-level vector. A
    /// builder is single-use; create a fresh one per key list.
    pub fn build<K: AsRef<[u8]>>(&mut self, keys: &[K]) -> Result<()> {
        validate_keys(keys)?;
        self.build_sparse(keys)?;
        self.node_counts = self.louds.iter().map(BitVector::count_ones).collect();
        if self.include_dense {
            self.determine_cutoff_level();
            self.fill_dense_vectors()?;
        } else {
            self.sparse_start_level = 0;
        }
        Ok(())
    }

    /// Number of levels laid out so far
    pub fn height(&self) -> usize {
        self.labels.len()
    }

    /// First level stored sparse; everything below it is dense
    pub fn sparse_start_level(&self) -> usize {
        self.sparse_start_level
    }

    /// Per-level edge labels (sparse format)
    pub fn labels(&self) -> &[Vec<u8>] {
        &self.labels
    }

    /// Per-level child-indicator bits, one per edge
    pub fn child_indicator(&self) -> &[BitVector] {
        &self.child_indicator
    }

    /// Per-level LOUDS bits, one per edge; set on each node's first edge
    pub fn louds(&self) -> &[BitVector] {
        &self.louds
    }

    /// Per-dense-level label bitmaps, 256 bits per node
    pub fn bitmap_labels(&self) -> &[BitVector] {
        &self.bitmap_labels
    }

    /// Per-dense-level child bitmaps, 256 bits per node
    pub fn bitmap_has_child(&self) -> &[BitVector] {
        &self.bitmap_has_child
    }

    /// Per-dense-level prefix-key bits, one per node
    pub fn prefixkey_indicator(&self) -> &[BitVector] {
        &self.prefixkey_indicator
    }

    /// Nodes per level
    pub fn node_counts(&self) -> &[usize] {
        &self.node_counts
    }

    /// Keys whose terminating edge sits at each level
    pub fn suffix_counts(&self) -> &[usize] {
        &self.suffix_counts
    }

    fn build_sparse<K: AsRef<[u8]>>(&mut self, keys: &[K]) -> Result<()> {
        let mut i = 0;
        while i < keys.len() {
            let key = keys[i].as_ref();
            // adjacent duplicates collapse onto their first occurrence
            while i + 1 < keys.len() && keys[i + 1].as_ref() == key {
                i += 1;
            }
            let next_key = keys.get(i + 1).map(|k| k.as_ref()).unwrap_or(&[]);
            let level = self.skip_common_prefix(key)?;
            let level = self.insert_key_bytes_until_unique(key, next_key, level);
            self.suffix_counts[level - 1] += 1;
            i += 1;
        }
        Ok(())
    }

    fn is_level_empty(&self, level: usize) -> bool {
        level >= self.height() || self.labels[level].is_empty()
    }

    fn ensure_level(&mut self, level: usize) {
        while self.height() <= level {
            self.labels.push(Vec::new());
            self.child_indicator.push(BitVector::new());
            self.louds.push(BitVector::new());
            self.suffix_counts.push(0);
        }
    }

    fn insert_key_byte(&mut self, c: u8, level: usize, is_start_of_node: bool) {
        self.ensure_level(level);
        self.labels[level].push(c);
        self.child_indicator[level].push(false);
        self.louds[level].push(is_start_of_node);
    }

    fn is_char_common_prefix(&self, c: u8, level: usize) -> bool {
        // a terminator edge never matches: c comes from a validated key, so c != 0
        level < self.height() && self.labels[level].last() == Some(&c)
    }

    /// Walk down the rightmost path shared with the previous key, marking
    /// each shared edge as having a child.
    fn skip_common_prefix(&mut self, key: &[u8]) -> Result<usize> {
        let mut level = 0;
        while level < key.len() && self.is_char_common_prefix(key[level], level) {
            let last = self.labels[level].len() - 1;
            self.child_indicator[level].set(last, true)?;
            level += 1;
        }
        Ok(level)
    }

    /// Insert key bytes from `start_level` until the key is distinguished
    /// from its successor, returning one past the terminating edge's level.
    fn insert_key_bytes_until_unique(
        &mut self,
        key: &[u8],
        next_key: &[u8],
        start_level: usize,
    ) -> usize {
        if key.is_empty() {
            // only ever the first key; it marks the root as a key
            let is_start = self.is_level_empty(0);
            self.insert_key_byte(TERMINATOR, 0, is_start);
            return 1;
        }

        // the predecessor's terminating edge always diverges before the key
        // runs out, so at least one byte remains to insert
        debug_assert!(start_level < key.len());

        let mut level = start_level;
        // the first byte past the common prefix joins the predecessor's node
        let is_start = self.is_level_empty(level);
        self.insert_key_byte(key[level], level, is_start);
        level += 1;

        // while the inserted prefix still matches the successor, each further
        // byte opens a fresh node
        let mut matches_next = level <= next_key.len() && key[..level] == next_key[..level];
        while level < key.len() && matches_next {
            self.insert_key_byte(key[level], level, true);
            level += 1;
            matches_next = level <= next_key.len() && key[level - 1] == next_key[level - 1];
        }

        if matches_next {
            // ran out of bytes: the key is a strict prefix of its successor
            debug_assert_eq!(level, key.len());
            self.insert_key_byte(TERMINATOR, level, true);
            level += 1;
        }
        level
    }

    /// Pick the first sparse level: extend the dense tier while its bitmap
    /// cost, scaled by the ratio, stays below the sparse cost of the rest.
    fn determine_cutoff_level(&mut self) {
        let height = self.height();
        let mut cutoff = 0;
        while cutoff < height
            && self.dense_bits_below(cutoff) * u64::from(self.sparse_dense_ratio)
                < self.sparse_bits_from(cutoff)
        {
            cutoff += 1;
        }
        self.sparse_start_level = cutoff;
    }

    /// Dense cost in bits of levels `[0, level)`: two 256-bit bitmaps plus a
    /// prefix-key bit per node.
    fn dense_bits_below(&self, level: usize) -> u64 {
        (0..level)
            .map(|l| self.node_counts[l] as u64 * (2 * FANOUT as u64 + 1))
            .sum()
    }

    /// Sparse cost in bits of levels `[level, height)`: a label byte plus a
    /// child bit and a LOUDS bit per edge.
    fn sparse_bits_from(&self, level: usize) -> u64 {
        (level..self.height())
            .map(|l| self.labels[l].len() as u64 * 10)
            .sum()
    }

    /// Re-express the levels below the cutoff as 256-bit-per-node bitmaps.
    /// Terminator edges become prefix-key bits instead of labels.
    fn fill_dense_vectors(&mut self) -> Result<()> {
        for level in 0..self.sparse_start_level {
            let num_nodes = self.node_counts[level];
            let mut labels_bm = BitVector::with_len(num_nodes * FANOUT);
            let mut child_bm = BitVector::with_len(num_nodes * FANOUT);
            let mut prefix_bm = BitVector::with_len(num_nodes);

            let mut node_num = 0;
            for pos in 0..self.labels[level].len() {
                if pos > 0 && self.louds[level].get(pos) == Some(true) {
                    node_num += 1;
                }
                let label = self.labels[level][pos];
                if label == TERMINATOR {
                    prefix_bm.set(node_num, true)?;
                } else {
                    let bit = node_num * FANOUT + label as usize;
                    labels_bm.set(bit, true)?;
                    if self.child_indicator[level].get(pos) == Some(true) {
                        child_bm.set(bit, true)?;
                    }
                }
            }

            self.bitmap_labels.push(labels_bm);
            self.bitmap_has_child.push(child_bm);
            self.prefixkey_indicator.push(prefix_bm);
        }
        Ok(())
    }
}

fn validate_keys<K: AsRef<[u8]>>(keys: &[K]) -> Result<()> {
    for (i, key) in keys.iter().enumerate() {
        let key = key.as_ref();
        if key.contains(&TERMINATOR) {
            return Err(FastrieError::invalid_input(format!(
                "key {} contains the reserved byte 0x00",
                i
            )));
        }
        if i > 0 && keys[i - 1].as_ref() > key {
            return Err(FastrieError::invalid_input(format!(
                "keys not sorted ascending at position {}",
                i
            )));
        }
    }
    Ok(())
}
