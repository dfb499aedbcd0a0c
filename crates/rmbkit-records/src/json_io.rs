//! Shared file plumbing: listing record files and reading/writing JSON.

use crate::error::{RecordsError, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().map(|e| e == ext).unwrap_or(false)
}

/// Files with extension `ext` directly inside `dir`, sorted by name.
pub fn list_files_with_extension(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(RecordsError::NotADirectory(dir.to_path_buf()));
    }
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).map_err(RecordsError::io(dir))? {
        let entry = entry.map_err(RecordsError::io(dir))?;
        let path = entry.path();
        if path.is_file() && has_extension(&path, ext) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// `.json` files directly inside `dir`, sorted by name.
pub fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    list_files_with_extension(dir, "json")
}

/// `.json` files anywhere under `root`, each directory visited in name order.
pub fn walk_json_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(RecordsError::NotADirectory(root.to_path_buf()));
    }
    let mut out = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|source| {
            let path = source.path().unwrap_or(root).to_path_buf();
            RecordsError::Walk { path, source }
        })?;
        if entry.file_type().is_file() && has_extension(entry.path(), "json") {
            out.push(entry.into_path());
        }
    }
    Ok(out)
}

pub fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(RecordsError::io(path))?;
    serde_json::from_str(&text).map_err(|source| RecordsError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize with four-space indentation.
pub fn to_pretty_bytes<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

pub fn write_json_pretty(path: &Path, value: &Value) -> Result<()> {
    let bytes = to_pretty_bytes(value).map_err(|source| RecordsError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, bytes).map_err(RecordsError::io(path))
}

/// Compact form: no whitespace between tokens.
pub fn write_json_compact(path: &Path, value: &Value) -> Result<()> {
    let bytes = serde_json::to_vec(value).map_err(|source| RecordsError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, bytes).map_err(RecordsError::io(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_is_flat_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("c.prefab"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/d.json"), "{}").unwrap();

        let flat = list_json_files(dir.path()).unwrap();
        let names: Vec<_> = flat
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);

        assert_eq!(walk_json_files(dir.path()).unwrap().len(), 3);
    }

    #[test]
    fn compact_and_pretty_forms() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.json");
        let value = serde_json::json!({"_list": [{"ID": "1"}]});

        write_json_compact(&path, &value).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"_list":[{"ID":"1"}]}"#);

        write_json_pretty(&path, &value).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\n    \"_list\": [\n        {\n            \"ID\": \"1\"\n        }\n    ]\n}"
        );
    }
}
