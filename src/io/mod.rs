//! Serialization plumbing: structured readers and writers over byte
//! sources and sinks.

pub mod data_input;
pub mod data_output;

pub use data_input::{DataInput, ReaderDataInput, SliceDataInput};
pub use data_output::{DataOutput, VecDataOutput, WriterDataOutput};
