//! Source discovery helpers.

use std::{
    io,
    path::{Path, PathBuf},
};

/// Report whether the named path is a directory.
pub fn is_directory(path: impl AsRef<Path>) -> bool {
    std::fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Report whether the named path is a regular file.
pub fn is_file(path: impl AsRef<Path>) -> bool {
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// List the `.rs` files directly inside `dir`, sorted by file name.
///
/// Sub-directories are not descended into.
pub fn rust_sources_in(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if is_file(&path) && path.extension().is_some_and(|ext| ext == "rs") {
            sources.push(path);
        }
    }
    sources.sort();
    Ok(sources)
}

/// Module name a source file contributes to its parent module.
///
/// Returns `None` for files that *are* the module (`mod.rs`, `lib.rs`, `main.rs`).
pub fn module_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    match stem {
        "mod" | "lib" | "main" => None,
        other => Some(other.to_string()),
    }
}
