//! Core domain types and models
//!
//! Defines the run configuration, the delimiter markers written around file
//! segments, and the statistics and summaries collected while chunking.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Current report schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Default chunk size in KiB
pub const DEFAULT_CHUNK_SIZE_KIB: u64 = 13;

/// Exclude pattern appended to every run so version-control metadata never lands in a chunk.
pub const VCS_EXCLUDE_PATTERN: &str = "**/.git/**";

/// File name of the run report written next to the chunk files.
pub const REPORT_FILE_NAME: &str = "chunk_report.json";

/// Delimiter line kinds written around each file segment in a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// First segment of a file
    Begin,
    /// Segment resuming a file split at the previous chunk boundary
    Continued,
    /// Last segment of a file
    End,
    /// Segment cut short by the chunk filling up; the file resumes in the next chunk
    EndPart,
}

impl Marker {
    pub fn label(self) -> &'static str {
        match self {
            Marker::Begin => "BEGIN FILE",
            Marker::Continued => "CONTINUED FILE",
            Marker::End => "END FILE",
            Marker::EndPart => "END PART OF FILE",
        }
    }

    /// Render the delimiter line for `relative_path`, including the surrounding newlines.
    pub fn line(self, relative_path: &str) -> String {
        format!("\n----{self}: {relative_path}----\n")
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One delimited run of a file's bytes inside a chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Path relative to the source root
    pub path: String,

    /// Opening delimiter (`Begin` or `Continued`)
    pub begin: Marker,

    /// Closing delimiter (`End` or `EndPart`)
    pub end: Marker,

    /// Raw payload bytes, delimiter lines excluded
    pub bytes: u64,
}

/// What ended up in one chunk file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSummary {
    /// Zero-based chunk index
    pub index: usize,

    /// Output file name (`chunk<index>.txt`)
    pub file_name: String,

    /// Payload bytes written, never above the configured capacity
    pub payload_bytes: u64,

    /// Segments in write order
    pub segments: Vec<Segment>,
}

/// Outcome of offering one file to the chunk writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// File content was placed into chunks
    Written { bytes: u64 },
    /// First block did not look like text; nothing was written
    SkippedBinary,
    /// File had no content
    SkippedEmpty,
}

/// Statistics from a chunking run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Regular files seen by the walk (excluding our own output)
    pub files_scanned: usize,

    /// Files whose content was written into chunks
    pub files_included: usize,

    /// Files rejected by include/exclude patterns
    #[serde(default)]
    pub files_skipped_filter: usize,

    /// Files skipped because the first block looked binary
    #[serde(default)]
    pub files_skipped_binary: usize,

    /// Files with no content
    #[serde(default)]
    pub files_skipped_empty: usize,

    /// Chunk files created
    pub chunks_created: usize,

    /// Payload bytes written across all chunks
    pub bytes_written: u64,

    /// Processing time in seconds
    #[serde(default)]
    pub processing_time_seconds: f64,
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Source root as given
    pub source: PathBuf,

    /// Output directory as given
    pub output_dir: PathBuf,

    pub stats: RunStats,

    /// Chunk summaries in index order
    pub chunks: Vec<ChunkSummary>,
}

/// Custom deserializer for glob lists: accepts a comma-separated string or an array.
///
/// Order is preserved and blank entries are dropped.
fn deserialize_globs<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct GlobsVisitor;

    impl<'de> Visitor<'de> for GlobsVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a comma-separated string or an array of glob patterns")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(split_globs(value))
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut result = Vec::new();
            while let Some(glob) = seq.next_element::<String>()? {
                let trimmed = glob.trim();
                if !trimmed.is_empty() {
                    result.push(trimmed.to_string());
                }
            }
            Ok(result)
        }
    }

    deserializer.deserialize_any(GlobsVisitor)
}

/// Split a comma-separated pattern list, trimming entries and dropping blanks.
pub fn split_globs(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(ToString::to_string).collect()
}

/// Main configuration for repo-to-chunks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Chunk capacity in KiB
    #[serde(default = "default_chunk_size_kib", alias = "chunksize")]
    pub chunk_size_kib: u64,

    #[serde(default, alias = "include", deserialize_with = "deserialize_globs")]
    pub include_patterns: Vec<String>,

    #[serde(default, alias = "exclude", deserialize_with = "deserialize_globs")]
    pub exclude_patterns: Vec<String>,

    #[serde(default)]
    pub follow_symlinks: bool,

    /// Write `chunk_report.json` next to the chunks
    #[serde(default = "default_true")]
    pub write_report: bool,

    /// Record `generated_at` in the report
    #[serde(default = "default_true")]
    pub timestamp: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size_kib: default_chunk_size_kib(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            follow_symlinks: false,
            write_report: true,
            timestamp: true,
        }
    }
}

impl Config {
    /// Chunk capacity in bytes.
    pub fn capacity_bytes(&self) -> u64 {
        self.chunk_size_kib.saturating_mul(1024)
    }

    /// Exclude patterns with the version-control pattern appended.
    pub fn effective_excludes(&self) -> Vec<String> {
        with_vcs_exclude(self.exclude_patterns.clone())
    }
}

/// Append [`VCS_EXCLUDE_PATTERN`] unless the list already has it.
pub fn with_vcs_exclude(mut patterns: Vec<String>) -> Vec<String> {
    if !patterns.iter().any(|p| p == VCS_EXCLUDE_PATTERN) {
        patterns.push(VCS_EXCLUDE_PATTERN.to_string());
    }
    patterns
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_chunk_size_kib() -> u64 {
    DEFAULT_CHUNK_SIZE_KIB
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_lines_wrap_relative_path() {
        assert_eq!(Marker::Begin.line("src/a.rs"), "\n----BEGIN FILE: src/a.rs----\n");
        assert_eq!(Marker::Continued.line("a"), "\n----CONTINUED FILE: a----\n");
        assert_eq!(Marker::End.line("a"), "\n----END FILE: a----\n");
        assert_eq!(Marker::EndPart.line("a"), "\n----END PART OF FILE: a----\n");
    }

    #[test]
    fn default_capacity_is_thirteen_kib() {
        assert_eq!(Config::default().capacity_bytes(), 13 * 1024);
    }

    #[test]
    fn vcs_exclude_is_always_appended_once() {
        let config = Config {
            exclude_patterns: vec!["**/*.png".to_string()],
            ..Config::default()
        };
        assert_eq!(config.effective_excludes(), vec!["**/*.png", VCS_EXCLUDE_PATTERN]);

        let config = Config {
            exclude_patterns: vec![VCS_EXCLUDE_PATTERN.to_string()],
            ..Config::default()
        };
        assert_eq!(config.effective_excludes(), vec![VCS_EXCLUDE_PATTERN]);
    }

    #[test]
    fn globs_accept_csv_or_array() {
        let from_csv: Config =
            serde_json::from_str(r#"{"include": " **/*.rs, ,**/*.md "}"#).expect("csv config");
        assert_eq!(from_csv.include_patterns, vec!["**/*.rs", "**/*.md"]);

        let from_array: Config =
            serde_json::from_str(r#"{"exclude_patterns": ["target/**", ""]}"#).expect("array");
        assert_eq!(from_array.exclude_patterns, vec!["target/**"]);
        assert_eq!(from_array.chunk_size_kib, DEFAULT_CHUNK_SIZE_KIB);
        assert!(from_array.write_report);
    }
}
