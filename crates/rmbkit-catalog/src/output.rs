use crate::builder::Catalog;
use crate::error::{CatalogError, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

const INDENT: &[u8] = b"    ";

impl Catalog {
    /// Serialize with four-space indentation, `list` first, then `templates`.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser).map_err(CatalogError::Serialize)?;
        Ok(buf)
    }
}

/// Write `catalog` to `path`, replacing any previous file.
///
/// The bytes go to a sibling `.tmp` file first and are renamed into place, so
/// `path` never holds a half-written catalog.
pub fn write_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    let bytes = catalog.to_json_pretty()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CatalogError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &bytes).map_err(|source| CatalogError::Write {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| CatalogError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "catalog written");
    Ok(())
}
