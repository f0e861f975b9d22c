//! Source tree walk feeding the chunk writer
//!
//! Directories are visited depth-first with entries sorted by file name. Every
//! regular file passes through the [`PathFilter`] and, if accepted, is streamed
//! into the [`ChunkWriter`] in walk order.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::chunk::{ChunkWriter, DirSink};
use crate::domain::{Config, FileOutcome, RunReport, RunStats, with_vcs_exclude};
use crate::error::{ChunkError, Result};
use crate::filter::PathFilter;
use crate::utils::{is_chunk_output_name, relative_display};

/// Walks a source tree and writes its text files into chunk files.
#[derive(Debug, Clone)]
pub struct TreeChunker {
    source: PathBuf,
    output_dir: PathBuf,
    chunk_size_kib: u64,
    include_patterns: Vec<String>,
    exclude_patterns: Vec<String>,
    follow_symlinks: bool,
}

impl TreeChunker {
    pub fn new(source: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        let defaults = Config::default();
        Self {
            source: source.into(),
            output_dir: output_dir.into(),
            chunk_size_kib: defaults.chunk_size_kib,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            follow_symlinks: false,
        }
    }

    pub fn from_config(
        source: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        config: &Config,
    ) -> Self {
        Self::new(source, output_dir)
            .chunk_size_kib(config.chunk_size_kib)
            .include_patterns(config.include_patterns.clone())
            .exclude_patterns(config.exclude_patterns.clone())
            .follow_symlinks(config.follow_symlinks)
    }

    pub fn chunk_size_kib(mut self, kib: u64) -> Self {
        self.chunk_size_kib = kib;
        self
    }

    pub fn include_patterns(mut self, patterns: Vec<String>) -> Self {
        self.include_patterns = patterns;
        self
    }

    /// Exclude patterns; `**/.git/**` is always added on top of these.
    pub fn exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Run the whole pass. The output directory is created before anything is read.
    pub fn run(&self) -> Result<RunReport> {
        let start_time = Instant::now();

        if self.chunk_size_kib == 0 {
            return Err(ChunkError::InvalidChunkSize(self.chunk_size_kib));
        }
        let excludes = with_vcs_exclude(self.exclude_patterns.clone());
        let filter = PathFilter::new(&self.include_patterns, &excludes)?;

        let sink = DirSink::create(&self.output_dir)?;
        let output_dir = fs::canonicalize(sink.dir()).map_err(|source| {
            ChunkError::CreateOutputDir { path: self.output_dir.clone(), source }
        })?;
        let mut writer = ChunkWriter::new(sink, self.chunk_size_kib.saturating_mul(1024))?;
        let mut stats = RunStats::default();

        let walker =
            WalkDir::new(&self.source).follow_links(self.follow_symlinks).sort_by_file_name();
        for entry in walker {
            let entry = entry?;
            if !is_regular_file(&entry) {
                continue;
            }
            let path = entry.path();
            if is_own_output(path, &output_dir) {
                debug!(path = %path.display(), "skipping our own output");
                continue;
            }

            stats.files_scanned += 1;
            if !filter.should_include(path) {
                debug!(path = %path.display(), "filtered out by patterns");
                stats.files_skipped_filter += 1;
                continue;
            }

            let relative = relative_display(&self.source, path);
            let file = File::open(path)
                .map_err(|source| ChunkError::Read { path: path.to_path_buf(), source })?;
            match writer.append_file(&relative, path, file)? {
                FileOutcome::Written { bytes } => {
                    stats.files_included += 1;
                    stats.bytes_written += bytes;
                }
                FileOutcome::SkippedBinary => {
                    stats.files_skipped_binary += 1;
                    println!("Skipping non-text file: {}", path.display());
                }
                FileOutcome::SkippedEmpty => stats.files_skipped_empty += 1,
            }
        }

        let chunks = writer.finish()?;
        stats.chunks_created = chunks.len();
        stats.processing_time_seconds = start_time.elapsed().as_secs_f64();
        info!(
            files = stats.files_included,
            chunks = stats.chunks_created,
            bytes = stats.bytes_written,
            "chunking complete"
        );

        Ok(RunReport {
            source: self.source.clone(),
            output_dir: self.output_dir.clone(),
            stats,
            chunks,
        })
    }
}

/// Regular files, plus symlinks that resolve to one.
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

/// True for chunk files and reports this tool wrote into `output_dir`.
fn is_own_output(path: &Path, output_dir: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if !is_chunk_output_name(name) {
        return false;
    }
    path.parent().and_then(|parent| fs::canonicalize(parent).ok()).is_some_and(|p| p == output_dir)
}
