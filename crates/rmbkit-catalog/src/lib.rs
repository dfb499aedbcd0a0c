//! Catalog index builder for RMB building-block templates.
//!
//! Walks a directory of `<category>-<subcategory>-<label>.json` templates and
//! aggregates them into a single document:
//! - `list`: one entry per template, with a sequential ID and the subcategory
//!   annotated with how many templates share its (category, subcategory) pair
//! - `templates`: the parsed content of each template, keyed by ID
//!
//! Template content is stored as an opaque [`serde_json::Value`]; the builder
//! never looks inside it.

pub mod builder;
pub mod discover;
pub mod error;
pub mod naming;
pub mod output;

pub use builder::{
    Catalog, CatalogBuilder, CatalogEntry, CatalogOptions, FileOutcome, SkippedFile,
    DEFAULT_OUTPUT_FILE, DEFAULT_START_ID,
};
pub use discover::discover_json_files;
pub use error::{CatalogError, Result};
pub use naming::{classify_file_name, format_id, Classification, SkipReason, TemplateName};
pub use output::write_catalog;

use std::path::Path;

/// Result of a full catalog build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub catalog: Catalog,
    /// Files that were found but produced no entry.
    pub skipped: Vec<SkippedFile>,
}

/// Discover, ingest and finish a catalog for everything under `root`.
///
/// Nothing is written; pair with [`write_catalog`].
pub fn build_catalog(root: &Path, options: &CatalogOptions) -> Result<BuildReport> {
    let files = discover_json_files(root)?;
    let mut builder = CatalogBuilder::new(options.clone());
    for path in &files {
        builder.ingest_file(path)?;
    }
    let skipped = builder.skipped().to_vec();
    let catalog = builder.finish();
    Ok(BuildReport { catalog, skipped })
}
