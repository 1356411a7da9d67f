//! Succinct bit storage: build-time bit vectors, rank/select indexes, and
//! bit-packed integer arrays.

pub mod bit_vector;
pub mod compact_array;
pub mod rank;
pub mod select;

pub use bit_vector::BitVector;
pub use compact_array::CompactArray;
pub use rank::RankBitVector;
pub use select::SelectBitVector;
