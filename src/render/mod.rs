//! Run report and console summary

use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{Config, RunReport, REPORT_FILE_NAME, REPORT_SCHEMA_VERSION};
use crate::error::{ChunkError, Result};
use crate::utils::format_with_commas;

/// Build the JSON document written to `chunk_report.json`.
pub fn render_report(
    report: &RunReport,
    config: &Config,
    include_timestamp: bool,
) -> serde_json::Value {
    let mut value = json!({
        "schema_version": REPORT_SCHEMA_VERSION,
        "source": report.source.to_string_lossy(),
        "config": {
            "chunk_size_kib":   config.chunk_size_kib,
            "capacity_bytes":   config.capacity_bytes(),
            "include_patterns": config.include_patterns,
            "exclude_patterns": config.effective_excludes(),
            "follow_symlinks":  config.follow_symlinks,
        },
        "stats": report.stats,
        "chunks": report.chunks,
    });
    if include_timestamp {
        value["generated_at"] = json!(chrono::Utc::now().to_rfc3339());
    }
    value
}

/// Write the report into the run's output directory and return its path.
pub fn write_report(
    report: &RunReport,
    config: &Config,
    include_timestamp: bool,
) -> Result<PathBuf> {
    let path = report.output_dir.join(REPORT_FILE_NAME);
    let value = render_report(report, config, include_timestamp);
    let mut body = serde_json::to_string_pretty(&value)?;
    body.push('\n');
    fs::write(&path, body).map_err(|source| ChunkError::Write { path: path.clone(), source })?;
    Ok(path)
}

/// Human-readable summary printed after a successful run.
pub fn render_summary(report: &RunReport, report_path: Option<&Path>) -> String {
    let stats = &report.stats;
    let mut lines = vec![
        String::new(),
        "Chunking complete!".to_string(),
        String::new(),
        "Statistics:".to_string(),
        format!("  Source:          {}", report.source.display()),
        format!("  Files scanned:   {}", stats.files_scanned),
        format!("  Files included:  {}", stats.files_included),
    ];

    let any_skipped = stats.files_skipped_filter > 0
        || stats.files_skipped_binary > 0
        || stats.files_skipped_empty > 0;
    if any_skipped {
        lines.push("  Files skipped:".to_string());
        if stats.files_skipped_filter > 0 {
            lines.push(format!("    patterns:    {}", stats.files_skipped_filter));
        }
        if stats.files_skipped_binary > 0 {
            lines.push(format!("    binary:      {}", stats.files_skipped_binary));
        }
        if stats.files_skipped_empty > 0 {
            lines.push(format!("    empty:       {}", stats.files_skipped_empty));
        }
    }

    lines.push(format!("  Chunks created:  {}", stats.chunks_created));
    lines.push(format!("  Total bytes:     {}", format_with_commas(stats.bytes_written)));
    lines.push(format!("  Processing time: {:.2}s", stats.processing_time_seconds));

    lines.push(String::new());
    lines.push("Output files:".to_string());
    for chunk in &report.chunks {
        lines.push(format!("  {}", report.output_dir.join(&chunk.file_name).display()));
    }
    if let Some(path) = report_path {
        lines.push(format!("  {}", path.display()));
    }

    lines.join("\n")
}
