use crate::error::{CatalogError, Result};
use crate::naming::TEMPLATE_EXTENSION;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collect every `.json` file under `root`.
///
/// Each directory's entries are visited in file-name order, so the result is
/// the same on every run over an unchanged tree. Symlinks to files are
/// listed like regular files; symlinked directories are not descended into.
pub fn discover_json_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(CatalogError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|source| {
            let path = source.path().unwrap_or(root).to_path_buf();
            CatalogError::Walk { path, source }
        })?;
        let is_file = if entry.path_is_symlink() {
            let resolved = entry.path().is_file();
            if !resolved && !entry.path().is_dir() {
                tracing::warn!(path = %entry.path().display(), "skipping dangling symlink");
            }
            resolved
        } else {
            entry.file_type().is_file()
        };
        if !is_file {
            continue;
        }
        let is_json = entry
            .path()
            .extension()
            .map(|ext| ext == TEMPLATE_EXTENSION)
            .unwrap_or(false);
        if is_json {
            files.push(entry.into_path());
        }
    }

    tracing::debug!(root = %root.display(), files = files.len(), "discovered JSON files");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn walks_nested_directories_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b/inner")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("z-z-z.json"), "{}").unwrap();
        fs::write(root.join("b/inner/x-y-z.json"), "{}").unwrap();
        fs::write(root.join("a/q-r-s.json"), "{}").unwrap();
        fs::write(root.join("a/notes.txt"), "hi").unwrap();

        let files = discover_json_files(root).unwrap();
        let rel: Vec<String> = files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        assert_eq!(rel, vec!["a/q-r-s.json", "b/inner/x-y-z.json", "z-z-z.json"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_listed_but_linked_dirs_are_not_walked() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let outside = dir.path().join("outside");
        let root = dir.path().join("root");
        fs::create_dir_all(outside.join("more")).unwrap();
        fs::create_dir_all(&root).unwrap();
        fs::write(outside.join("real.json"), "{}").unwrap();
        fs::write(outside.join("more/m-n-o.json"), "{}").unwrap();
        symlink(outside.join("real.json"), root.join("walls-brick-small.json")).unwrap();
        symlink(outside.join("more"), root.join("linked")).unwrap();
        symlink(outside.join("gone.json"), root.join("x-y-z.json")).unwrap();

        let files = discover_json_files(&root).unwrap();
        assert_eq!(files, vec![root.join("walls-brick-small.json")]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_json_files(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, CatalogError::NotADirectory(_)));
    }
}
