//! Remove byte-identical record files.

use crate::error::{RecordsError, Result};
use crate::json_io::list_json_files;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupeReport {
    /// Files kept, one per distinct content.
    pub kept: Vec<PathBuf>,
    /// Files removed (or that would be removed on a dry run), with the kept original.
    pub removed: Vec<(PathBuf, PathBuf)>,
}

/// Hex SHA-256 of a file's raw bytes.
pub fn file_sha256(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(RecordsError::io(path))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Delete every `.json` file in `dir` whose bytes match an earlier file.
///
/// Files are considered in name order and the first of each content group
/// is kept. Only the top level of `dir` is scanned.
pub fn dedupe_dir(dir: &Path, dry_run: bool) -> Result<DedupeReport> {
    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut report = DedupeReport::default();

    for path in list_json_files(dir)? {
        let digest = file_sha256(&path)?;
        match seen.get(&digest) {
            Some(original) => {
                if !dry_run {
                    fs::remove_file(&path).map_err(RecordsError::io(&path))?;
                }
                tracing::info!(
                    path = %path.display(),
                    original = %original.display(),
                    dry_run,
                    "deleted duplicate file"
                );
                report.removed.push((path, original.clone()));
            }
            None => {
                seen.insert(digest, path.clone());
                report.kept.push(path);
            }
        }
    }

    Ok(report)
}
