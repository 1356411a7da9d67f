//! Static trie index facade
//!
//! Orchestrates the build pipeline (builder → dense/sparse tiers → suffix
//! assignment), answers exact-match queries, and moves the whole index
//! through the serialization layer in one self-contained stream.

use std::io::Write;
use std::mem;

use crate::config::{
    KeyId, DEFAULT_SPARSE_DENSE_RATIO, SERIAL_MAGIC, SERIAL_VERSION, TERMINATOR,
};
use crate::error::{FastrieError, Result};
use crate::io::{DataInput, DataOutput, SliceDataInput, VecDataOutput};
use crate::louds::{Builder, DenseResult, LoudsDense, LoudsSparse};
use crate::suffix::SuffixStore;

/// A static, read-only trie index over a presorted set of distinct byte
/// keys.
///
/// [`exact_search`](Trie::exact_search) answers whether a query equals one
/// of the indexed keys and, if so, returns its stable [`KeyId`] in
/// `[0, num_keys)`. The index is immutable after construction: queries take
/// `&self`, hold no interior state, and are safe to run concurrently from
/// any number of threads.
///
/// # Examples
///
/// ```rust
/// use fastrie::Trie;
///
/// let keys: Vec<&[u8]> = vec![b"alpha", b"beta", b"gamma"];
/// let trie = Trie::build(&keys)?;
///
/// assert_eq!(trie.num_keys(), 3);
/// assert!(trie.exact_search(b"beta").is_some());
/// assert!(trie.exact_search(b"delta").is_none());
/// # Ok::<(), fastrie::FastrieError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Trie {
    dense: LoudsDense,
    sparse: LoudsSparse,
    suffixes: SuffixStore,
    num_keys: u32,
}

/// Structure and size snapshot of a built index.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrieStats {
    /// Number of indexed keys
    pub num_keys: usize,
    /// Total trie nodes across both tiers
    pub num_nodes: usize,
    /// Tree height in levels
    pub height: usize,
    /// First level stored sparse
    pub sparse_start_level: usize,
    /// Suffix arena size in bytes
    pub suffix_bytes: usize,
    /// Heap bytes held by the index
    pub memory_usage: usize,
    /// Size of the serialized stream in bytes
    pub serialized_size: u64,
    /// Memory cost per key, in bits
    pub bits_per_key: f64,
}

impl Trie {
    /// Build an index with the default dense tier settings.
    ///
    /// Keys must be sorted ascending and free of the byte `0x00`; adjacent
    /// duplicates are collapsed.
    pub fn build<K: AsRef<[u8]>>(keys: &[K]) -> Result<Self> {
        Self::build_with(keys, true, DEFAULT_SPARSE_DENSE_RATIO)
    }

    /// Build an index with explicit dense tier settings.
    ///
    /// `include_dense` turns the bitmap tier off entirely;
    /// `sparse_dense_ratio` steers how deep it reaches (larger keeps it
    /// shallower).
    pub fn build_with<K: AsRef<[u8]>>(
        keys: &[K],
        include_dense: bool,
        sparse_dense_ratio: u32,
    ) -> Result<Self> {
        let mut builder = Builder::new(include_dense, sparse_dense_ratio);
        builder.build(keys)?;

        let dense = LoudsDense::new(&builder);
        let sparse = LoudsSparse::new(&builder);
        let num_keys: usize = builder.suffix_counts().iter().sum();

        // Re-traverse each key to learn its ID and terminating level, then
        // hand the residual tails to the suffix store in ID order.
        let mut tails: Vec<Option<&[u8]>> = vec![None; num_keys];
        for (i, key) in keys.iter().enumerate() {
            let key = key.as_ref();
            if i > 0 && keys[i - 1].as_ref() == key {
                continue;
            }
            let (key_id, level) = traverse(&dense, &sparse, key)
                .expect("freshly built trie must contain every input key");
            let slot = &mut tails[key_id as usize];
            debug_assert!(slot.is_none(), "key id {} assigned twice", key_id);
            *slot = Some(&key[level..]);
        }
        let tails: Vec<&[u8]> = tails
            .into_iter()
            .map(|t| t.expect("every key id must receive a suffix"))
            .collect();
        let suffixes = SuffixStore::build(&tails);

        Ok(Self {
            dense,
            sparse,
            suffixes,
            num_keys: num_keys as u32,
        })
    }

    /// Look up `key` exactly. Returns its ID, or `None` when the key is not
    /// in the indexed set. Never fails and never panics on well-formed
    /// indexes.
    pub fn exact_search(&self, key: &[u8]) -> Option<KeyId> {
        if key.contains(&TERMINATOR) {
            // the reserved byte cannot occur in any indexed key
            return None;
        }
        let (key_id, level) = traverse(&self.dense, &self.sparse, key)?;
        if self.suffixes.matches(key_id, &key[level..]) {
            Some(key_id)
        } else {
            None
        }
    }

    /// Number of indexed keys
    pub fn num_keys(&self) -> usize {
        self.num_keys as usize
    }

    /// Total number of trie nodes across both tiers
    pub fn num_nodes(&self) -> usize {
        self.dense.num_nodes() + self.sparse.num_nodes()
    }

    /// Suffix arena size in bytes
    pub fn suffix_bytes(&self) -> usize {
        self.suffixes.arena_bytes()
    }

    /// Tree height in levels
    pub fn height(&self) -> usize {
        self.sparse.height()
    }

    /// First level stored sparse; equals the dense tier height
    pub fn sparse_start_level(&self) -> usize {
        self.sparse.start_level()
    }

    /// Heap bytes held by the index
    pub fn memory_usage(&self) -> usize {
        mem::size_of::<Self>()
            + self.dense.memory_usage()
            + self.sparse.memory_usage()
            + self.suffixes.memory_usage()
    }

    /// Exact size of the serialized stream in bytes
    pub fn serialized_size(&self) -> u64 {
        4 + 4
            + self.dense.serialized_size()
            + self.sparse.serialized_size()
            + 4
            + self.suffixes.serialized_size()
    }

    /// Structure and size snapshot
    pub fn stats(&self) -> TrieStats {
        let memory_usage = self.memory_usage();
        let bits_per_key = if self.num_keys == 0 {
            0.0
        } else {
            (memory_usage * 8) as f64 / self.num_keys as f64
        };
        TrieStats {
            num_keys: self.num_keys(),
            num_nodes: self.num_nodes(),
            height: self.height(),
            sparse_start_level: self.sparse_start_level(),
            suffix_bytes: self.suffix_bytes(),
            memory_usage,
            serialized_size: self.serialized_size(),
            bits_per_key,
        }
    }

    /// Serialize the whole index to `out`.
    pub fn save<O: DataOutput>(&self, out: &mut O) -> Result<()> {
        out.write_u32(SERIAL_MAGIC)?;
        out.write_u32(SERIAL_VERSION)?;
        self.dense.save(out)?;
        self.sparse.save(out)?;
        out.write_u32(self.num_keys)?;
        self.suffixes.save(out)?;
        out.flush()
    }

    /// Reload an index previously written by [`save`](Self::save).
    pub fn load<I: DataInput>(input: &mut I) -> Result<Self> {
        let magic = input.read_u32()?;
        if magic != SERIAL_MAGIC {
            return Err(FastrieError::corrupt_index("bad magic"));
        }
        let version = input.read_u32()?;
        if version != SERIAL_VERSION {
            return Err(FastrieError::corrupt_index(format!(
                "unsupported format version {:#010x}",
                version
            )));
        }
        let dense = LoudsDense::load(input)?;
        let sparse = LoudsSparse::load(input)?;
        if sparse.start_level() != dense.height() {
            return Err(FastrieError::corrupt_index("tier boundary disagrees"));
        }
        let num_keys = input.read_u32()?;
        let suffixes = SuffixStore::load(input)?;
        if suffixes.num_ptrs() != num_keys {
            return Err(FastrieError::corrupt_index("suffix pointer count"));
        }
        Ok(Self {
            dense,
            sparse,
            suffixes,
            num_keys,
        })
    }

    /// Serialize into a fresh byte vector.
    pub fn save_to_vec(&self) -> Result<Vec<u8>> {
        let mut out = VecDataOutput::with_capacity(self.serialized_size() as usize);
        self.save(&mut out)?;
        Ok(out.into_vec())
    }

    /// Reload from an in-memory stream.
    pub fn load_from_slice(data: &[u8]) -> Result<Self> {
        Self::load(&mut SliceDataInput::new(data))
    }

    /// Dump the full structure to `w` for debugging.
    pub fn debug_print<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        self.dense.debug_print(w)?;
        self.sparse.debug_print(w)?;
        self.suffixes.debug_print(w)?;
        writeln!(w, "num_keys: {}", self.num_keys)
    }
}

/// Walk the query through the dense tier and, when handed off, the sparse
/// tier. Returns the terminating edge's key ID and the level at which the
/// stored suffix begins.
fn traverse(dense: &LoudsDense, sparse: &LoudsSparse, key: &[u8]) -> Option<(KeyId, usize)> {
    match dense.find_key(key) {
        DenseResult::Found { key_id, level } => Some((key_id, level)),
        DenseResult::Descend { node_num } => sparse.find_key(key, node_num),
        DenseResult::NotFound => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids_of(trie: &Trie, keys: &[&[u8]]) -> Vec<KeyId> {
        keys.iter()
            .map(|k| trie.exact_search(k).expect("key must be present"))
            .collect()
    }

    #[test]
    fn test_build_and_search() {
        let keys: Vec<&[u8]> = vec![b"cat", b"cow", b"dog", b"dove"];
        let trie = Trie::build(&keys).unwrap();

        assert_eq!(trie.num_keys(), 4);
        let ids = ids_of(&trie, &keys);
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, vec![0, 1, 2, 3]);

        assert_eq!(trie.exact_search(b"ca"), None);
        assert_eq!(trie.exact_search(b"cats"), None);
        assert_eq!(trie.exact_search(b"d"), None);
        assert_eq!(trie.exact_search(b""), None);
    }

    #[test]
    fn test_dense_and_sparse_agree() {
        let keys: Vec<&[u8]> = vec![b"aa", b"aab", b"abc", b"b", b"bcd", b"bce"];
        let dense = Trie::build_with(&keys, true, 0).unwrap();
        let sparse = Trie::build_with(&keys, false, 0).unwrap();
        let mixed = Trie::build(&keys).unwrap();

        assert_eq!(dense.sparse_start_level(), dense.height());
        assert_eq!(sparse.sparse_start_level(), 0);

        for key in &keys {
            let id = dense.exact_search(key);
            assert!(id.is_some());
            assert_eq!(id, sparse.exact_search(key), "key {:?}", key);
            assert_eq!(id, mixed.exact_search(key), "key {:?}", key);
        }
        for miss in [b"a".as_ref(), b"ab", b"bc", b"bcf", b"aabx", b"z"] {
            assert_eq!(dense.exact_search(miss), None);
            assert_eq!(sparse.exact_search(miss), None);
            assert_eq!(mixed.exact_search(miss), None);
        }
    }

    #[test]
    fn test_query_with_reserved_byte_misses() {
        let keys: Vec<&[u8]> = vec![b"a", b"ab"];
        let trie = Trie::build(&keys).unwrap();
        assert_eq!(trie.exact_search(b"a\x00"), None);
        assert_eq!(trie.exact_search(b"\x00"), None);
    }

    #[test]
    fn test_empty_key_set() {
        let trie = Trie::build(&[] as &[&[u8]]).unwrap();
        assert_eq!(trie.num_keys(), 0);
        assert_eq!(trie.exact_search(b""), None);
        assert_eq!(trie.exact_search(b"anything"), None);

        let bytes = trie.save_to_vec().unwrap();
        let loaded = Trie::load_from_slice(&bytes).unwrap();
        assert_eq!(loaded.num_keys(), 0);
    }

    #[test]
    fn test_empty_key_indexed() {
        let keys: Vec<&[u8]> = vec![b"", b"a"];
        let trie = Trie::build(&keys).unwrap();
        assert_eq!(trie.num_keys(), 2);
        assert!(trie.exact_search(b"").is_some());
        assert!(trie.exact_search(b"a").is_some());
        assert_ne!(trie.exact_search(b""), trie.exact_search(b"a"));
    }

    #[test]
    fn test_duplicate_adjacent_keys() {
        let keys: Vec<&[u8]> = vec![b"x", b"x", b"y"];
        let trie = Trie::build(&keys).unwrap();
        assert_eq!(trie.num_keys(), 2);
        assert!(trie.exact_search(b"x").is_some());
        assert!(trie.exact_search(b"y").is_some());
    }

    #[test]
    fn test_serialized_size_is_exact() {
        let keys: Vec<&[u8]> = vec![b"serial", b"size", b"test"];
        let trie = Trie::build(&keys).unwrap();
        let bytes = trie.save_to_vec().unwrap();
        assert_eq!(bytes.len() as u64, trie.serialized_size());
    }

    #[test]
    fn test_load_rejects_garbage() {
        assert!(Trie::load_from_slice(&[]).is_err());
        assert!(Trie::load_from_slice(&[0x12, 0x34, 0x56, 0x78, 0, 0, 0, 0]).is_err());

        let keys: Vec<&[u8]> = vec![b"k"];
        let trie = Trie::build(&keys).unwrap();
        let bytes = trie.save_to_vec().unwrap();
        // truncation anywhere must surface as corruption, not a panic
        for cut in 0..bytes.len() {
            let err = Trie::load_from_slice(&bytes[..cut]).unwrap_err();
            assert_eq!(err.category(), "corrupt", "cut at {}", cut);
        }
    }

    #[test]
    fn test_stats_snapshot() {
        let keys: Vec<&[u8]> = vec![b"one", b"two"];
        let trie = Trie::build(&keys).unwrap();
        let stats = trie.stats();
        assert_eq!(stats.num_keys, 2);
        assert_eq!(stats.height, trie.height());
        assert!(stats.memory_usage > 0);
        assert!(stats.bits_per_key > 0.0);
        assert_eq!(stats.serialized_size, trie.serialized_size());
    }

    #[test]
    fn test_debug_print_runs() {
        let keys: Vec<&[u8]> = vec![b"ab", b"ac"];
        let trie = Trie::build(&keys).unwrap();
        let mut out = Vec::new();
        trie.debug_print(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Dense"));
        assert!(text.contains("Sparse"));
        assert!(text.contains("num_keys: 2"));
    }

    #[test]
    fn test_trie_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Trie>();
    }
}
