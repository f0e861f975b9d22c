//! Destinations for chunk output

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ChunkError, Result};
use crate::utils::chunk_file_name;

/// Creates the output stream for each chunk.
pub trait ChunkSink {
    type Output: Write;

    /// Open chunk `index` for writing. Called once per index, in increasing order.
    fn open_chunk(&mut self, index: usize) -> io::Result<Self::Output>;

    /// Location of chunk `index`, used in error messages and summaries.
    fn chunk_path(&self, index: usize) -> PathBuf;
}

/// Writes `chunk<index>.txt` files into a directory.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    /// Create the output directory (and parents) if needed.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .map_err(|source| ChunkError::CreateOutputDir { path: dir.clone(), source })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ChunkSink for DirSink {
    type Output = BufWriter<File>;

    fn open_chunk(&mut self, index: usize) -> io::Result<Self::Output> {
        File::create(self.chunk_path(index)).map(BufWriter::new)
    }

    fn chunk_path(&self, index: usize) -> PathBuf {
        self.dir.join(chunk_file_name(index))
    }
}

#[cfg(test)]
mod tests {
    use super::{ChunkSink, DirSink};
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn dir_sink_creates_nested_output_dir() {
        let tmp = TempDir::new().expect("tempdir");
        let out = tmp.path().join("a").join("b");
        let mut sink = DirSink::create(&out).expect("create");
        assert!(out.is_dir());

        let mut chunk = sink.open_chunk(3).expect("open");
        chunk.write_all(b"hello").expect("write");
        chunk.flush().expect("flush");
        drop(chunk);

        assert_eq!(sink.chunk_path(3), out.join("chunk3.txt"));
        assert_eq!(std::fs::read_to_string(out.join("chunk3.txt")).expect("read"), "hello");
    }

    #[test]
    fn dir_sink_fails_when_path_is_a_file() {
        let tmp = TempDir::new().expect("tempdir");
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "x").expect("write blocker");
        let err = DirSink::create(blocker.join("out")).expect_err("must fail");
        assert!(err.to_string().contains("failed to create output directory"));
    }
}
