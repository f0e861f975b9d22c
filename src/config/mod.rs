//! Configuration loading
//!
//! Layers, lowest precedence first: built-in defaults, a config file, then
//! `REPO_TO_CHUNKS_*` environment variables. CLI flags are merged on top by
//! [`merge_cli_with_config`].

mod merge;

pub use merge::{merge_cli_with_config, CliOverrides};

use figment::providers::{Env, Format, Toml, Yaml};
use figment::Figment;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::Config;
use crate::error::{ChunkError, Result};

/// Prefix for environment overrides, e.g. `REPO_TO_CHUNKS_CHUNK_SIZE_KIB=16`.
pub const ENV_PREFIX: &str = "REPO_TO_CHUNKS_";

/// Config files looked up in the source directory when `--config` is not given.
pub const CONFIG_FILE_NAMES: &[&str] =
    &["repo-to-chunks.toml", ".repo-to-chunks.toml", ".repo-to-chunks.yml"];

/// Load configuration for a run over `source_dir`.
///
/// An explicit config file must exist; discovered ones are optional.
pub fn load_config(source_dir: &Path, explicit: Option<&Path>) -> Result<Config> {
    let file = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(ChunkError::Read {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "config file not found",
                    ),
                });
            }
            Some(path.to_path_buf())
        }
        None => discover_config(source_dir),
    };

    let mut figment = Figment::new();
    if let Some(path) = file.as_deref() {
        debug!(path = %path.display(), "loading config file");
        figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml" | "yaml") => figment.merge(Yaml::file(path)),
            _ => figment.merge(Toml::file(path)),
        };
    }
    figment = figment.merge(Env::prefixed(ENV_PREFIX));

    Ok(figment.extract()?)
}

fn discover_config(source_dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES.iter().map(|name| source_dir.join(name)).find(|path| path.is_file())
}
