//! Shared constants and type aliases for the trie index.

/// Identifier assigned to each indexed key, in `[0, num_keys)`.
///
/// IDs follow in-trie terminator enumeration order (level, then node, then
/// label), not input order, and are stable across save/load.
pub type KeyId = u32;

/// Depth of a node in the trie; the root sits at level 0.
pub type Level = usize;

/// Maximum fanout of a trie node: one child per possible byte.
pub const FANOUT: usize = 256;

/// Bits per storage word in all bitvectors.
pub const WORD_BITS: usize = 64;

/// Reserved label byte. Marks a key that ends inside the trie (the key is a
/// strict prefix of another key, or is empty). Keys must not contain it.
pub const TERMINATOR: u8 = 0;

/// Basic block size, in bits, of the rank lookup table.
pub const RANK_BLOCK_BITS: usize = 512;

/// One select sample is kept per this many set bits.
pub const SELECT_SAMPLE_RATE: usize = 64;

/// Default cost ratio steering the dense/sparse cutoff: a level stays dense
/// while the accumulated dense bitmap cost times this ratio is below the
/// sparse cost of the remaining levels.
pub const DEFAULT_SPARSE_DENSE_RATIO: u32 = 64;

/// Leading bytes of every serialized index ("FTRI").
pub const SERIAL_MAGIC: u32 = 0x4654_5249;

/// Serialized format version, packed `0xMMmmpppp`.
pub const SERIAL_VERSION: u32 = 0x0100_0000;
