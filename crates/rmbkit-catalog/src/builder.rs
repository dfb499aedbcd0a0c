//! The catalog aggregation object.
//!
//! IDs are handed out as documents are added and never change afterwards.
//! Subcategory annotation and list ordering only happen in [`CatalogBuilder::finish`],
//! once every occurrence count is final.

use crate::error::{CatalogError, Result};
use crate::naming::{
    annotate_subcategory, classify_file_name, format_id, Classification, SkipReason, TemplateName,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// First ID handed out when nothing else is configured.
pub const DEFAULT_START_ID: u64 = 3000;

/// File name the catalog is written to by default.
pub const DEFAULT_OUTPUT_FILE: &str = "output.json";

/// Options controlling a catalog build.
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    /// ID assigned to the first eligible template.
    pub start_id: u64,
    /// Skip (and log) templates whose content is not valid JSON instead of
    /// failing the whole build.
    pub skip_invalid_json: bool,
    /// Where the catalog will be written. When it lives under the search root
    /// it is excluded from the walk.
    pub output_path: Option<PathBuf>,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            start_id: DEFAULT_START_ID,
            skip_invalid_json: false,
            output_path: None,
        }
    }
}

/// One row of the catalog list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Subcategory")]
    pub subcategory: String,
}

impl CatalogEntry {
    fn sort_key(&self) -> (&str, &str, &str) {
        (&self.category, &self.subcategory, &self.label)
    }
}

/// The aggregate output document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub list: Vec<CatalogEntry>,
    /// Template content keyed by ID, in ID assignment order.
    pub templates: Map<String, Value>,
}

impl Catalog {
    /// True when `list` and `templates` carry exactly the same IDs, each once.
    pub fn ids_consistent(&self) -> bool {
        let mut list_ids = BTreeSet::new();
        for entry in &self.list {
            if !list_ids.insert(entry.id.as_str()) {
                return false;
            }
        }
        list_ids.len() == self.templates.len()
            && self.templates.keys().all(|id| list_ids.contains(id.as_str()))
    }

    /// True when `list` is ordered by (category, annotated subcategory, label).
    pub fn is_sorted(&self) -> bool {
        self.list
            .windows(2)
            .all(|pair| pair[0].sort_key() <= pair[1].sort_key())
    }
}

/// What happened to one file handed to [`CatalogBuilder::ingest_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Added { id: String },
    Skipped(SkipReason),
}

/// A file that produced no entry, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
struct PendingEntry {
    id: String,
    name: TemplateName,
    source: PathBuf,
}

/// Accumulates templates for one build; consumed by [`CatalogBuilder::finish`].
#[derive(Debug)]
pub struct CatalogBuilder {
    options: CatalogOptions,
    excluded: Option<PathBuf>,
    /// `None` once the ID space is used up.
    next_id: Option<u64>,
    entries: Vec<PendingEntry>,
    counts: HashMap<(String, String), usize>,
    templates: Map<String, Value>,
    skipped: Vec<SkippedFile>,
}

impl CatalogBuilder {
    pub fn new(options: CatalogOptions) -> Self {
        let excluded = options
            .output_path
            .as_ref()
            .and_then(|p| p.canonicalize().ok());
        Self {
            next_id: Some(options.start_id),
            options,
            excluded,
            entries: Vec::new(),
            counts: HashMap::new(),
            templates: Map::new(),
            skipped: Vec::new(),
        }
    }

    /// Number of templates added so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Files that were looked at but produced no entry, in the order seen.
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    /// Add an already-parsed template and return the ID it was given.
    ///
    /// Fails with [`CatalogError::IdsExhausted`] once `u64::MAX` has been handed out.
    pub fn add_document(
        &mut self,
        source: impl Into<PathBuf>,
        name: TemplateName,
        content: Value,
    ) -> Result<String> {
        let source = source.into();
        let Some(next) = self.next_id else {
            return Err(CatalogError::IdsExhausted { path: source });
        };
        let id = format_id(next);
        self.next_id = next.checked_add(1);

        *self
            .counts
            .entry((name.category.clone(), name.subcategory.clone()))
            .or_insert(0) += 1;
        self.templates.insert(id.clone(), content);
        self.entries.push(PendingEntry {
            id: id.clone(),
            name,
            source,
        });
        Ok(id)
    }

    /// Classify, read and parse `path`, adding it when it is an eligible template.
    ///
    /// Read failures always abort. Parse failures (including content that is
    /// not UTF-8) abort unless [`CatalogOptions::skip_invalid_json`] is set.
    pub fn ingest_file(&mut self, path: &Path) -> Result<FileOutcome> {
        if self.is_excluded(path) {
            return Ok(self.skip(path, SkipReason::OutputFile));
        }

        let name = match classify_file_name(path) {
            Classification::Eligible(name) => name,
            Classification::Skipped(reason) => {
                tracing::debug!(path = %path.display(), %reason, "skipping file");
                return Ok(self.skip(path, reason));
            }
        };

        let bytes = fs::read(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let content: Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(source) if self.options.skip_invalid_json => {
                tracing::warn!(path = %path.display(), error = %source, "skipping invalid JSON template");
                let reason = SkipReason::InvalidJson {
                    message: source.to_string(),
                };
                return Ok(self.skip(path, reason));
            }
            Err(source) => {
                return Err(CatalogError::Json {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let id = self.add_document(path, name, content)?;
        tracing::debug!(path = %path.display(), %id, "added template");
        Ok(FileOutcome::Added { id })
    }

    /// Annotate subcategories with their final counts and sort the list.
    pub fn finish(self) -> Catalog {
        let counts = self.counts;
        let mut list: Vec<CatalogEntry> = self
            .entries
            .into_iter()
            .map(|entry| {
                tracing::trace!(id = %entry.id, source = %entry.source.display(), "catalog entry");
                let TemplateName {
                    category,
                    subcategory,
                    label,
                } = entry.name;
                let key = (category, subcategory);
                let count = counts.get(&key).copied().unwrap_or_default();
                let (category, subcategory) = key;
                CatalogEntry {
                    id: entry.id,
                    label,
                    category,
                    subcategory: annotate_subcategory(&subcategory, count),
                }
            })
            .collect();

        // Stable: identical keys keep ID order.
        list.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        tracing::info!(
            entries = list.len(),
            subcategories = counts.len(),
            skipped = self.skipped.len(),
            "catalog assembled"
        );

        Catalog {
            list,
            templates: self.templates,
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        match &self.excluded {
            Some(excluded) => path
                .canonicalize()
                .map(|p| &p == excluded)
                .unwrap_or(false),
            None => false,
        }
    }

    fn skip(&mut self, path: &Path, reason: SkipReason) -> FileOutcome {
        self.skipped.push(SkippedFile {
            path: path.to_path_buf(),
            reason: reason.clone(),
        });
        FileOutcome::Skipped(reason)
    }
}
