//! # fastrie: a static fast-succinct-trie index
//!
//! This crate builds a compact, read-only index over a presorted set of
//! distinct byte-string keys. The index answers one question — does this
//! query equal one of the indexed keys, and if so, what is its stable
//! integer ID in `[0, N)` — and serializes to a self-contained byte stream
//! that reloads without reconstruction.
//!
//! ## Structure
//!
//! - **Dense tier**: the upper trie levels, stored as 256-bit bitmaps per
//!   node with rank indexes for O(1) child stepping.
//! - **Sparse tier**: the lower levels, stored as per-edge label bytes with
//!   LOUDS node markers, navigated by rank/select.
//! - **Suffix arena**: each key's residual tail in one shared byte arena
//!   with back-suffix sharing; the final byte-compare against the arena is
//!   what proves membership.
//!
//! ## Quick start
//!
//! ```rust
//! use fastrie::Trie;
//!
//! let keys: Vec<&[u8]> = vec![b"ACML", b"ICDM", b"ICML", b"SDM", b"SIGKDD"];
//! let trie = Trie::build(&keys)?;
//!
//! assert_eq!(trie.num_keys(), 5);
//! let id = trie.exact_search(b"ICML").expect("indexed key");
//! assert!((id as usize) < trie.num_keys());
//! assert!(trie.exact_search(b"SIGMOD").is_none());
//!
//! // round-trip through the serialized form
//! let bytes = trie.save_to_vec()?;
//! let reloaded = fastrie::Trie::load_from_slice(&bytes)?;
//! assert_eq!(reloaded.exact_search(b"ICML"), Some(id));
//! # Ok::<(), fastrie::FastrieError>(())
//! ```
//!
//! ## Contract
//!
//! Keys must arrive sorted ascending, contain no `0x00` byte (it is the
//! internal terminator), and are treated as opaque byte sequences. Key IDs
//! follow in-trie enumeration order, not input order, and are stable across
//! save/load. The built index is immutable: all query methods take `&self`
//! and the type is `Send + Sync`.

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod error;
pub mod io;
pub mod louds;
pub mod succinct;
pub mod suffix;
pub mod trie;

pub use config::{KeyId, Level};
pub use error::{FastrieError, Result};
pub use trie::{Trie, TrieStats};
