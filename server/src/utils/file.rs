//! Path helpers for user-supplied locations

use std::path::PathBuf;

/// Expand `~` and make relative paths absolute against the working directory.
///
/// Used for `--config` and `RECORDQL_DATA_DIR`, which users often type as
/// `~/...` or `./...`. Surrounding whitespace is ignored; an empty string
/// resolves to the working directory.
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();
    let cwd = || std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if path.is_empty() {
        return cwd();
    }

    let home_relative = match path {
        "~" => dirs::home_dir(),
        _ => path
            .strip_prefix("~/")
            .and_then(|rest| dirs::home_dir().map(|home| home.join(rest))),
    };
    let expanded = home_relative.unwrap_or_else(|| PathBuf::from(path));

    if expanded.is_relative() {
        cwd().join(expanded)
    } else {
        expanded
    }
}
