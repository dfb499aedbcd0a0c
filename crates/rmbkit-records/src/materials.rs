//! Copy a custom material definition next to each matching prefab.
//!
//! The game picks up `<prefab>.json` as the material override for
//! `<prefab>.prefab`, so one source definition is duplicated under every
//! prefab's name.

use crate::error::{RecordsError, Result};
use crate::json_io::list_files_with_extension;
use std::fs;
use std::path::{Path, PathBuf};

const PREFAB_EXTENSION: &str = "prefab";

/// True when `stem` should get a material copy. An empty suffix set matches all.
pub fn prefab_selected(stem: &str, suffixes: &[char]) -> bool {
    suffixes.is_empty() || stem.chars().last().map(|c| suffixes.contains(&c)).unwrap_or(false)
}

/// Copy `source` to `<stem>.json` for every selected `*.prefab` in `dir`.
///
/// Existing targets are overwritten. Returns the written paths in name order.
pub fn copy_materials(dir: &Path, source: &Path, suffixes: &[char]) -> Result<Vec<PathBuf>> {
    if !source.is_file() {
        return Err(RecordsError::Io {
            path: source.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "source material not found"),
        });
    }
    let source_canonical = source.canonicalize().map_err(RecordsError::io(source))?;

    let mut written = Vec::new();
    for prefab in list_files_with_extension(dir, PREFAB_EXTENSION)? {
        let Some(stem) = prefab.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if !prefab_selected(stem, suffixes) {
            continue;
        }
        let target = dir.join(format!("{stem}.json"));
        let is_source = target
            .canonicalize()
            .map(|t| t == source_canonical)
            .unwrap_or(false);
        if is_source {
            continue;
        }
        fs::copy(source, &target).map_err(RecordsError::io(&target))?;
        tracing::info!(target = %target.display(), "copied material");
        written.push(target);
    }
    Ok(written)
}
