//! Repo-to-Chunks: split a directory tree into fixed-size text chunks
//!
//! This library walks a source tree, filters files with include/exclude glob
//! patterns, and streams text content into capacity-bounded chunk files that
//! can be pasted into size-limited prompt windows.

pub mod chunk;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod render;
pub mod utils;
pub mod walk;

pub use chunk::{ChunkSink, ChunkWriter, DirSink};
pub use domain::{Config, RunReport};
pub use error::{ChunkError, Result};
pub use filter::PathFilter;
pub use walk::TreeChunker;
