//! CLI argument merging with config

use crate::domain::Config;

#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub chunk_size_kib: Option<u64>,
    pub include_patterns: Option<Vec<String>>,
    pub exclude_patterns: Option<Vec<String>>,
    pub follow_symlinks: Option<bool>,
    pub write_report: Option<bool>,
    pub timestamp: Option<bool>,
}

pub fn merge_cli_with_config(mut base_config: Config, cli: CliOverrides) -> Config {
    if let Some(chunk_size_kib) = cli.chunk_size_kib {
        base_config.chunk_size_kib = chunk_size_kib;
    }

    if let Some(include_patterns) = cli.include_patterns {
        base_config.include_patterns = include_patterns;
    }
    if let Some(exclude_patterns) = cli.exclude_patterns {
        base_config.exclude_patterns = exclude_patterns;
    }

    if let Some(follow_symlinks) = cli.follow_symlinks {
        base_config.follow_symlinks = follow_symlinks;
    }
    if let Some(write_report) = cli.write_report {
        base_config.write_report = write_report;
    }
    if let Some(timestamp) = cli.timestamp {
        base_config.timestamp = timestamp;
    }

    base_config
}
