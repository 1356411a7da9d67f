//! Immutable bit vector with constant-time rank support
//!
//! The trie keeps all of its per-level bit arrays concatenated in structures
//! of this type. A lookup table over 512-bit basic blocks makes `rank1` a
//! single table read plus at most eight word popcounts.

use crate::config::{RANK_BLOCK_BITS, WORD_BITS};
use crate::error::{FastrieError, Result};
use crate::io::{DataInput, DataOutput};
use crate::succinct::BitVector;

const WORDS_PER_BLOCK: usize = RANK_BLOCK_BITS / WORD_BITS;

/// An immutable bit vector with a precomputed rank index.
///
/// `rank_lut[i]` holds the number of set bits in `bits[0 .. i * 512)`;
/// `rank1` is inclusive of its position argument, i.e. it counts the ones in
/// `bits[0 ..= pos]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankBitVector {
    words: Vec<u64>,
    num_bits: usize,
    rank_lut: Vec<u32>,
    num_ones: usize,
}

impl RankBitVector {
    /// Build from a single bit vector
    pub fn from_bit_vector(bits: &BitVector) -> Self {
        Self::from_levels(std::slice::from_ref(bits))
    }

    /// Build from per-level bit vectors, concatenated bit-exactly in order
    /// with no per-level padding.
    pub fn from_levels(levels: &[BitVector]) -> Self {
        let mut words = Vec::new();
        let mut num_bits = 0usize;
        for level in levels {
            append_bits(&mut words, &mut num_bits, level.words(), level.len());
        }
        Self::from_words(words, num_bits)
    }

    fn from_words(words: Vec<u64>, num_bits: usize) -> Self {
        let mut v = Self {
            words,
            num_bits,
            rank_lut: Vec::new(),
            num_ones: 0,
        };
        v.init_rank_lut();
        v
    }

    fn init_rank_lut(&mut self) {
        let num_blocks = self.num_bits / RANK_BLOCK_BITS + 1;
        let mut lut = Vec::with_capacity(num_blocks);
        let mut cumulative = 0u32;
        for block in 0..num_blocks {
            lut.push(cumulative);
            let start = block * WORDS_PER_BLOCK;
            let end = (start + WORDS_PER_BLOCK).min(self.words.len());
            for &w in &self.words[start..end] {
                cumulative += w.count_ones();
            }
        }
        self.num_ones = self.words.iter().map(|w| w.count_ones() as usize).sum();
        self.rank_lut = lut;
    }

    /// Number of bits stored
    #[inline]
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Total number of set bits
    #[inline]
    pub fn num_ones(&self) -> usize {
        self.num_ones
    }

    /// Get the bit at `pos`
    #[inline]
    pub fn bit(&self, pos: usize) -> bool {
        debug_assert!(pos < self.num_bits);
        (self.words[pos / WORD_BITS] >> (pos % WORD_BITS)) & 1 == 1
    }

    /// Count the set bits in `bits[0 ..= pos]`
    #[inline]
    pub fn rank1(&self, pos: usize) -> usize {
        debug_assert!(pos < self.num_bits);
        let block = pos / RANK_BLOCK_BITS;
        self.rank_lut[block] as usize
            + popcount_prefix(&self.words[block * WORDS_PER_BLOCK..], pos % RANK_BLOCK_BITS + 1)
    }

    /// Distance from `pos` to the next set bit strictly after it, or to the
    /// end of the vector when no further bit is set.
    pub fn distance_to_next_one(&self, pos: usize) -> usize {
        let start = pos + 1;
        if start >= self.num_bits {
            return self.num_bits - pos;
        }
        let mut word_idx = start / WORD_BITS;
        let mut word = self.words[word_idx] & (u64::MAX << (start % WORD_BITS));
        loop {
            if word != 0 {
                return word_idx * WORD_BITS + word.trailing_zeros() as usize - pos;
            }
            word_idx += 1;
            if word_idx * WORD_BITS >= self.num_bits {
                return self.num_bits - pos;
            }
            word = self.words[word_idx];
        }
    }

    /// Packed storage words
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Heap bytes held, rank table included
    pub fn memory_usage(&self) -> usize {
        self.words.len() * 8 + self.rank_lut.len() * 4
    }

    /// Bytes this structure occupies in the serialized stream
    pub fn serialized_size(&self) -> u64 {
        4 + self.words.len() as u64 * 8
    }

    /// Write to `out`. The rank table is not written; it is rebuilt on load.
    pub fn save<O: DataOutput>(&self, out: &mut O) -> Result<()> {
        out.write_u32(self.num_bits as u32)?;
        for &w in &self.words {
            out.write_u64(w)?;
        }
        Ok(())
    }

    /// Read a vector previously written by [`save`](Self::save).
    pub fn load<I: DataInput>(input: &mut I) -> Result<Self> {
        let num_bits = input.read_u32()? as usize;
        let num_words = (num_bits + WORD_BITS - 1) / WORD_BITS;
        let mut words = Vec::with_capacity(num_words);
        for _ in 0..num_words {
            words.push(input.read_u64()?);
        }
        if let Some(&last) = words.last() {
            let used = num_bits - (num_words - 1) * WORD_BITS;
            if used < WORD_BITS && last >> used != 0 {
                return Err(FastrieError::corrupt_index("nonzero bit vector padding"));
            }
        }
        Ok(Self::from_words(words, num_bits))
    }
}

/// Count the set bits in the first `num_bits` bits of `words`.
#[inline]
fn popcount_prefix(words: &[u64], num_bits: usize) -> usize {
    let full = num_bits / WORD_BITS;
    let mut count = 0;
    for &w in &words[..full] {
        count += w.count_ones() as usize;
    }
    let rem = num_bits % WORD_BITS;
    if rem > 0 {
        count += (words[full] & ((1u64 << rem) - 1)).count_ones() as usize;
    }
    count
}

/// Append `src_bits` bits held in `src` words onto `(dst, dst_bits)`.
///
/// `src`'s final word must be zero past `src_bits`, which `BitVector`
/// guarantees for its storage.
fn append_bits(dst: &mut Vec<u64>, dst_bits: &mut usize, src: &[u64], src_bits: usize) {
    if src_bits == 0 {
        return;
    }
    let src_words = (src_bits + WORD_BITS - 1) / WORD_BITS;
    let shift = *dst_bits % WORD_BITS;
    if shift == 0 {
        dst.extend_from_slice(&src[..src_words]);
    } else {
        for &w in &src[..src_words] {
            let last = dst.len() - 1;
            dst[last] |= w << shift;
            dst.push(w >> (WORD_BITS - shift));
        }
    }
    *dst_bits += src_bits;
    dst.truncate((*dst_bits + WORD_BITS - 1) / WORD_BITS);
}
