//! Path helpers for delimiters and chunk output files

use std::path::Path;

const CHUNK_PREFIX: &str = "chunk";
const CHUNK_SUFFIX: &str = ".txt";

/// Path of `path` relative to `root`, always `/`-separated.
///
/// Falls back to the path itself when it does not live under `root`.
pub fn relative_display(root: &Path, path: &Path) -> String {
    let relative = match path.strip_prefix(root) {
        // Source root is the file itself.
        Ok(rel) if rel.as_os_str().is_empty() => path.file_name().map(Path::new).unwrap_or(path),
        Ok(rel) => rel,
        Err(_) => path,
    };
    relative.to_string_lossy().replace('\\', "/")
}

/// File name of the chunk with the given index.
pub fn chunk_file_name(index: usize) -> String {
    format!("{CHUNK_PREFIX}{index}{CHUNK_SUFFIX}")
}

/// True for names this tool writes into the output directory.
pub fn is_chunk_output_name(name: &str) -> bool {
    if name == crate::domain::REPORT_FILE_NAME {
        return true;
    }
    name.strip_prefix(CHUNK_PREFIX)
        .and_then(|rest| rest.strip_suffix(CHUNK_SUFFIX))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
