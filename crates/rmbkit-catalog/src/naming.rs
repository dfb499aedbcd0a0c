//! File-name classification for catalog templates.
//!
//! A template is named `<category>-<subcategory>-<label>.json`. Anything else
//! is classified as skipped, with the reason recorded so callers (and tests)
//! can tell a two-part name apart from a non-JSON file.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extension (without dot) of files the builder looks at.
pub const TEMPLATE_EXTENSION: &str = "json";

/// The three `-`-separated parts of an eligible template name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateName {
    pub category: String,
    pub subcategory: String,
    pub label: String,
}

/// Why a discovered file produced no catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SkipReason {
    /// The extension is not `.json`.
    NotJson,
    /// The file name is not valid UTF-8.
    NonUtf8Name,
    /// The extension-stripped name split into `parts` pieces instead of 3.
    NamePartCount { parts: usize },
    /// The content failed to parse and invalid JSON is being skipped.
    InvalidJson { message: String },
    /// The file is the catalog output itself.
    OutputFile,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotJson => write!(f, "not a .json file"),
            SkipReason::NonUtf8Name => write!(f, "file name is not valid UTF-8"),
            SkipReason::NamePartCount { parts } => {
                write!(f, "name has {parts} dash-separated part(s), expected 3")
            }
            SkipReason::InvalidJson { message } => write!(f, "invalid JSON: {message}"),
            SkipReason::OutputFile => write!(f, "catalog output file"),
        }
    }
}

/// Result of looking at a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Eligible(TemplateName),
    Skipped(SkipReason),
}

/// Classify `path` by its file name alone; the file is not opened.
pub fn classify_file_name(path: &Path) -> Classification {
    let is_json = path
        .extension()
        .map(|ext| ext == TEMPLATE_EXTENSION)
        .unwrap_or(false);
    if !is_json {
        return Classification::Skipped(SkipReason::NotJson);
    }

    let Some(stem) = path.file_stem() else {
        return Classification::Skipped(SkipReason::NamePartCount { parts: 0 });
    };
    let Some(stem) = stem.to_str() else {
        return Classification::Skipped(SkipReason::NonUtf8Name);
    };

    let parts: Vec<&str> = stem.split('-').collect();
    match parts.as_slice() {
        [category, subcategory, label] => Classification::Eligible(TemplateName {
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            label: label.to_string(),
        }),
        _ => Classification::Skipped(SkipReason::NamePartCount { parts: parts.len() }),
    }
}

/// Zero-pad an ID to at least four digits; wider numbers keep all digits.
pub fn format_id(id: u64) -> String {
    format!("{id:04}")
}

/// The `"<subcategory> [<count>]"` form written into the final list.
pub fn annotate_subcategory(subcategory: &str, count: usize) -> String {
    format!("{subcategory} [{count}]")
}
