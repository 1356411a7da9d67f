//! Shared suffix arena
//!
//! The trie distinguishes keys but does not prove them: each key's residual
//! tail lives in a single byte arena, addressed by a bit-packed pointer per
//! key ID, and the final byte-compare against the arena is what establishes
//! membership. Tails are appended in descending reversed-lexicographic
//! order so a tail equal to the end of an earlier tail shares its bytes.

use std::io::Write;

use crate::config::{KeyId, TERMINATOR};
use crate::error::{FastrieError, Result};
use crate::io::{DataInput, DataOutput};
use crate::succinct::compact_array::{width_for, CompactArray};

/// Residual key tails in one shared arena, one pointer per key ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixStore {
    ptrs: CompactArray,
    arena: Vec<u8>,
}

impl SuffixStore {
    /// Build from the per-key-ID tails. `tails[id]` is the residual of the
    /// key with that ID; the index position is the key ID.
    pub fn build(tails: &[&[u8]]) -> Self {
        let mut order: Vec<u32> = (0..tails.len() as u32).collect();
        order.sort_by(|&a, &b| {
            tails[a as usize]
                .iter()
                .rev()
                .cmp(tails[b as usize].iter().rev())
        });

        let mut ptrs = vec![0u32; tails.len()];
        let mut arena = vec![TERMINATOR];
        let mut prev: Option<u32> = None;

        // walk in descending reversed order; equal endings cluster here
        for &id in order.iter().rev() {
            let tail = tails[id as usize];
            if tail.is_empty() {
                ptrs[id as usize] = 0;
                continue;
            }
            let prev_tail = prev.map(|p| tails[p as usize]).unwrap_or(&[]);
            let matched = tail
                .iter()
                .rev()
                .zip(prev_tail.iter().rev())
                .take_while(|(a, b)| a == b)
                .count();

            if matched == tail.len() && !prev_tail.is_empty() {
                // the whole tail is the ending of the previous one
                let prev_ptr = prev.map(|p| ptrs[p as usize]).unwrap_or(0);
                ptrs[id as usize] = prev_ptr + (prev_tail.len() - matched) as u32;
            } else {
                ptrs[id as usize] = arena.len() as u32;
                arena.extend_from_slice(tail);
                arena.push(TERMINATOR);
            }
            prev = Some(id);
        }

        let width = width_for(arena.len() as u64);
        Self {
            ptrs: CompactArray::from_values(&ptrs, width),
            arena,
        }
    }

    /// Check whether the stored tail of `key_id` is exactly `tail`.
    ///
    /// Never panics: malformed pointers simply fail to match.
    pub fn matches(&self, key_id: KeyId, tail: &[u8]) -> bool {
        let mut pos = self.ptrs.get(key_id) as usize;
        for &byte in tail {
            if self.arena.get(pos) != Some(&byte) {
                return false;
            }
            pos += 1;
        }
        self.arena.get(pos) == Some(&TERMINATOR)
    }

    /// Number of key IDs with a pointer
    pub fn num_ptrs(&self) -> u32 {
        self.ptrs.len()
    }

    /// Arena size in bytes, sentinel and terminators included
    pub fn arena_bytes(&self) -> usize {
        self.arena.len()
    }

    /// Heap bytes held
    pub fn memory_usage(&self) -> usize {
        self.ptrs.memory_usage() + self.arena.len()
    }

    /// Bytes this structure occupies in the serialized stream
    pub fn serialized_size(&self) -> u64 {
        self.ptrs.serialized_size() + 8 + self.arena.len() as u64
    }

    /// Write to `out`
    pub fn save<O: DataOutput>(&self, out: &mut O) -> Result<()> {
        self.ptrs.save(out)?;
        out.write_u64(self.arena.len() as u64)?;
        out.write_bytes(&self.arena)
    }

    /// Read a store previously written by [`save`](Self::save).
    pub fn load<I: DataInput>(input: &mut I) -> Result<Self> {
        let ptrs = CompactArray::load(input)?;
        let arena_len = input.read_u64()? as usize;
        let arena = input.read_vec(arena_len)?;
        if arena.first() != Some(&TERMINATOR) {
            return Err(FastrieError::corrupt_index("suffix arena sentinel"));
        }
        Ok(Self { ptrs, arena })
    }

    /// Dump pointers and arena content for debugging.
    pub fn debug_print<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        writeln!(w, "-- Suffixes ({} bytes) --", self.arena.len())?;
        write!(w, "POINTERS:")?;
        for i in 0..self.ptrs.len() {
            write!(w, " {}", self.ptrs.get(i))?;
        }
        writeln!(w)?;
        write!(w, "ARENA:")?;
        for &byte in &self.arena {
            match byte {
                0x21..=0x7e => write!(w, " {}", byte as char)?,
                TERMINATOR => write!(w, " ?")?,
                _ => write!(w, " {:02x}", byte)?,
            }
        }
        writeln!(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_store_and_match() {
        let tails: Vec<&[u8]> = vec![b"tail", b"", b"x"];
        let store = SuffixStore::build(&tails);

        assert!(store.matches(0, b"tail"));
        assert!(store.matches(1, b""));
        assert!(store.matches(2, b"x"));

        assert!(!store.matches(0, b"tai"));
        assert!(!store.matches(0, b"tails"));
        assert!(!store.matches(1, b"y"));
        assert!(!store.matches(2, b""));
    }

    #[test]
    fn test_back_sharing() {
        // both "ring" and "ing" are endings of "string"; only "string" is
        // materialized and the others point into it
        let tails: Vec<&[u8]> = vec![b"string", b"ing", b"ring"];
        let store = SuffixStore::build(&tails);

        assert!(store.matches(0, b"string"));
        assert!(store.matches(1, b"ing"));
        assert!(store.matches(2, b"ring"));
        assert!(!store.matches(2, b"ing"));

        assert_eq!(store.arena_bytes(), 1 + b"string".len() + 1);
    }

    #[test]
    fn test_equal_tails_share_fully() {
        let tails: Vec<&[u8]> = vec![b"same", b"same", b"same"];
        let store = SuffixStore::build(&tails);
        for id in 0..3 {
            assert!(store.matches(id, b"same"));
        }
        assert_eq!(store.arena_bytes(), 1 + b"same".len() + 1);
    }

    #[test]
    fn test_empty_tails_all_point_at_sentinel() {
        let tails: Vec<&[u8]> = vec![b"", b"", b""];
        let store = SuffixStore::build(&tails);
        assert_eq!(store.arena_bytes(), 1);
        for id in 0..3 {
            assert!(store.matches(id, b""));
            assert!(!store.matches(id, b"a"));
        }
    }

    #[test]
    fn test_no_tails() {
        let store = SuffixStore::build(&[]);
        assert_eq!(store.num_ptrs(), 0);
        assert_eq!(store.arena_bytes(), 1);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let tails: Vec<&[u8]> = vec![b"alpha", b"beta", b"a", b"", b"ta"];
        let store = SuffixStore::build(&tails);

        use crate::io::{SliceDataInput, VecDataOutput};
        let mut out = VecDataOutput::new();
        store.save(&mut out).unwrap();
        assert_eq!(out.len() as u64, store.serialized_size());

        let loaded = SuffixStore::load(&mut SliceDataInput::new(out.as_slice())).unwrap();
        assert_eq!(loaded, store);
        for (id, tail) in tails.iter().enumerate() {
            assert!(loaded.matches(id as KeyId, tail));
        }
    }

    #[test]
    fn test_load_rejects_missing_sentinel() {
        let store = SuffixStore::build(&[b"q".as_ref()]);
        use crate::io::{SliceDataInput, VecDataOutput};
        let mut out = VecDataOutput::new();
        store.save(&mut out).unwrap();
        let mut bytes = out.into_vec();
        let arena_start = bytes.len() - store.arena_bytes();
        bytes[arena_start] = b'!';
        assert!(SuffixStore::load(&mut SliceDataInput::new(&bytes)).is_err());
    }
}
