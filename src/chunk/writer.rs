//! Capacity-bounded chunk writer
//!
//! Files are streamed in blocks of at most one chunk capacity. Each block is
//! placed into the open chunk; when the chunk fills up the current segment is
//! closed with `END PART OF FILE` (if the file has more bytes) and the rest
//! continues in a fresh chunk under a `CONTINUED FILE` delimiter. Delimiter
//! lines do not count against the capacity.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::sink::ChunkSink;
use crate::domain::{ChunkSummary, FileOutcome, Marker, Segment};
use crate::error::{ChunkError, Result};
use crate::utils::{chunk_file_name, SniffClassifier, TextClassifier};

/// A chunk that is currently accepting bytes.
struct OpenChunk<W: Write> {
    writer: W,
    path: PathBuf,
    remaining: usize,
    summary: ChunkSummary,
}

impl<W: Write> OpenChunk<W> {
    fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer
            .write_all(bytes)
            .map_err(|source| ChunkError::Write { path: self.path.clone(), source })
    }

    fn open_segment(&mut self, begin: Marker, relative_path: &str) -> Result<()> {
        self.write_raw(begin.line(relative_path).as_bytes())?;
        self.summary.segments.push(Segment {
            path: relative_path.to_string(),
            begin,
            end: Marker::End,
            bytes: 0,
        });
        Ok(())
    }

    /// Write as much of `bytes` as fits; returns the number written.
    fn write_payload(&mut self, bytes: &[u8]) -> Result<usize> {
        let n = bytes.len().min(self.remaining);
        self.write_raw(&bytes[..n])?;
        self.remaining -= n;
        self.summary.payload_bytes += n as u64;
        if let Some(segment) = self.summary.segments.last_mut() {
            segment.bytes += n as u64;
        }
        Ok(n)
    }

    fn close_segment(&mut self, end: Marker, relative_path: &str) -> Result<()> {
        self.write_raw(end.line(relative_path).as_bytes())?;
        if let Some(segment) = self.summary.segments.last_mut() {
            segment.end = end;
        }
        Ok(())
    }

    fn finalize(mut self) -> Result<ChunkSummary> {
        self.writer.flush().map_err(|source| ChunkError::Write { path: self.path, source })?;
        Ok(self.summary)
    }
}

/// Streams file contents into fixed-capacity chunks.
///
/// At most one chunk is open at a time. Chunk indices start at 0 and grow by
/// one per chunk created.
pub struct ChunkWriter<S: ChunkSink, C: TextClassifier = SniffClassifier> {
    sink: S,
    classifier: C,
    capacity: usize,
    next_index: usize,
    open: Option<OpenChunk<S::Output>>,
    finished: Vec<ChunkSummary>,
}

impl<S: ChunkSink> ChunkWriter<S> {
    pub fn new(sink: S, capacity_bytes: u64) -> Result<Self> {
        Self::with_classifier(sink, capacity_bytes, SniffClassifier)
    }
}

impl<S: ChunkSink, C: TextClassifier> ChunkWriter<S, C> {
    pub fn with_classifier(sink: S, capacity_bytes: u64, classifier: C) -> Result<Self> {
        let capacity = usize::try_from(capacity_bytes)
            .ok()
            .filter(|&c| c > 0)
            .ok_or(ChunkError::InvalidChunkSize(capacity_bytes / 1024))?;
        Ok(Self { sink, classifier, capacity, next_index: 0, open: None, finished: Vec::new() })
    }

    /// Chunks finalized so far, in index order.
    pub fn finished(&self) -> &[ChunkSummary] {
        &self.finished
    }

    /// Append one file's content.
    ///
    /// `relative_path` goes into the delimiter lines, `source_path` into read
    /// errors. The first block decides text vs. binary for the whole file; a
    /// binary file leaves the writer untouched.
    pub fn append_file<R: Read>(
        &mut self,
        relative_path: &str,
        source_path: &Path,
        mut reader: R,
    ) -> Result<FileOutcome> {
        let read_err =
            |source: io::Error| ChunkError::Read { path: source_path.to_path_buf(), source };

        let mut block = read_block(&mut reader, self.capacity).map_err(read_err)?;
        if block.is_empty() {
            debug!(path = relative_path, "empty file, nothing to write");
            return Ok(FileOutcome::SkippedEmpty);
        }
        if !self.classifier.is_text(&block) {
            debug!(path = relative_path, "first block is not text, skipping file");
            return Ok(FileOutcome::SkippedBinary);
        }

        let mut written = 0u64;
        let mut continued = false;
        let mut segment_open = false;
        loop {
            let next = read_block(&mut reader, self.capacity).map_err(read_err)?;
            let last_block = next.is_empty();

            let mut rest: &[u8] = &block;
            while !rest.is_empty() {
                let chunk = self.current_chunk()?;
                if !segment_open {
                    let begin = if continued { Marker::Continued } else { Marker::Begin };
                    chunk.open_segment(begin, relative_path)?;
                    segment_open = true;
                }

                let n = chunk.write_payload(rest)?;
                rest = &rest[n..];
                written += n as u64;

                if chunk.remaining == 0 {
                    let more = !rest.is_empty() || !last_block;
                    let end = if more { Marker::EndPart } else { Marker::End };
                    chunk.close_segment(end, relative_path)?;
                    segment_open = false;
                    continued = more;
                    self.finalize_open()?;
                }
            }

            if last_block {
                if segment_open {
                    if let Some(chunk) = self.open.as_mut() {
                        chunk.close_segment(Marker::End, relative_path)?;
                    }
                }
                break;
            }
            block = next;
        }

        Ok(FileOutcome::Written { bytes: written })
    }

    /// Finalize the last open chunk and return every chunk summary.
    pub fn finish(mut self) -> Result<Vec<ChunkSummary>> {
        self.finalize_open()?;
        Ok(self.finished)
    }

    fn current_chunk(&mut self) -> Result<&mut OpenChunk<S::Output>> {
        let chunk = match self.open.take() {
            Some(chunk) => chunk,
            None => self.open_next()?,
        };
        Ok(self.open.insert(chunk))
    }

    fn open_next(&mut self) -> Result<OpenChunk<S::Output>> {
        let index = self.next_index;
        let path = self.sink.chunk_path(index);
        let writer = self
            .sink
            .open_chunk(index)
            .map_err(|source| ChunkError::Write { path: path.clone(), source })?;
        self.next_index += 1;
        debug!(chunk = index, path = %path.display(), "opened chunk");
        Ok(OpenChunk {
            writer,
            path,
            remaining: self.capacity,
            summary: ChunkSummary {
                index,
                file_name: chunk_file_name(index),
                payload_bytes: 0,
                segments: Vec::new(),
            },
        })
    }

    fn finalize_open(&mut self) -> Result<()> {
        if let Some(chunk) = self.open.take() {
            let summary = chunk.finalize()?;
            debug!(chunk = summary.index, bytes = summary.payload_bytes, "finalized chunk");
            self.finished.push(summary);
        }
        Ok(())
    }
}

/// Read up to `limit` bytes, looping over short reads. Empty means end of input.
fn read_block<R: Read>(reader: &mut R, limit: usize) -> io::Result<Vec<u8>> {
    let mut block = Vec::with_capacity(limit.min(64 * 1024));
    reader.by_ref().take(limit as u64).read_to_end(&mut block)?;
    Ok(block)
}
