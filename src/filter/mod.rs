//! Include/exclude path filtering
//!
//! Patterns use extended glob syntax: `*` stays within one path component,
//! `**` spans any number of directories. They are matched against the full
//! walked path, not just the file name.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;

use crate::error::{ChunkError, Result};

/// Compiled include and exclude pattern sets.
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: Option<GlobSet>,
    exclude: GlobSet,
}

impl PathFilter {
    /// Compile both pattern lists. An empty include list means "include everything".
    pub fn new(include_patterns: &[String], exclude_patterns: &[String]) -> Result<Self> {
        let include = if include_patterns.is_empty() {
            None
        } else {
            Some(build_globset(include_patterns)?)
        };
        let exclude = build_globset(exclude_patterns)?;
        Ok(Self { include, exclude })
    }

    /// Decide whether `path` takes part in the chunking pass.
    ///
    /// Exclusion wins over inclusion.
    pub fn should_include(&self, path: &Path) -> bool {
        if self.exclude.is_match(path) {
            return false;
        }
        match &self.include {
            Some(include) => include.is_match(path),
            None => true,
        }
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern).literal_separator(true).build().map_err(|source| {
            ChunkError::InvalidPattern { pattern: pattern.clone(), source }
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ChunkError::InvalidPattern {
        pattern: patterns.join(","),
        source,
    })
}
