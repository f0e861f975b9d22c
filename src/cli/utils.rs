//! Shared helpers for CLI argument handling

use std::ffi::OsString;

use crate::domain::split_globs;

/// Long options that are also accepted with a single leading dash.
const SINGLE_DASH_LONGS: &[&str] = &["chunksize", "chunk-size", "include", "exclude", "config"];

/// Split an optional comma-separated flag value. `None` means the flag was absent.
pub fn parse_csv(value: &Option<String>) -> Option<Vec<String>> {
    value.as_deref().map(split_globs)
}

/// Rewrite `-include=...` style options to `--include=...` so clap does not
/// read them as `-i` followed by a glued value. Arguments after `--` are left alone.
pub fn normalize_single_dash_longs<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut after_separator = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if after_separator {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                after_separator = true;
                return arg;
            }
            let Some(rest) = text.strip_prefix('-').filter(|r| !r.starts_with('-')) else {
                return arg;
            };
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if SINGLE_DASH_LONGS.contains(&name) {
                OsString::from(format!("-{text}"))
            } else {
                arg
            }
        })
        .collect()
}
