//! Fixed-capacity chunk output

pub mod sink;
pub mod writer;

pub use sink::{ChunkSink, DirSink};
pub use writer::ChunkWriter;
