//! Terrain tags assigned from the last digit(s) of an item ID.

use crate::error::{RecordsError, Result};
use crate::json_io::{read_json, write_json_compact};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    pub suffix: String,
    pub tag: String,
}

impl TagRule {
    pub fn new(suffix: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            tag: tag.into(),
        }
    }

    /// Parse `SUFFIX=TAG`.
    pub fn parse(spec: &str) -> Option<Self> {
        let (suffix, tag) = spec.split_once('=')?;
        if suffix.is_empty() || tag.is_empty() {
            return None;
        }
        Some(Self::new(suffix, tag))
    }
}

/// `1 -> dirt`, `2 -> grass`, `3 -> rock`.
pub fn default_tag_rules() -> Vec<TagRule> {
    vec![
        TagRule::new("1", "dirt"),
        TagRule::new("2", "grass"),
        TagRule::new("3", "rock"),
    ]
}

/// Set `Tags` on every `_list` item whose `ID` ends with a rule's suffix.
/// Rules are tried in order. Returns how many items were tagged, or `None`
/// when the document has no `_list` array.
pub fn tag_items(doc: &mut Value, rules: &[TagRule]) -> Option<usize> {
    let items = doc.get_mut("_list")?.as_array_mut()?;
    let mut tagged = 0;
    for item in items.iter_mut().filter_map(Value::as_object_mut) {
        let Some(id) = item.get("ID").and_then(Value::as_str) else {
            continue;
        };
        if let Some(rule) = rules.iter().find(|r| id.ends_with(r.suffix.as_str())) {
            item.insert("Tags".to_string(), Value::String(rule.tag.clone()));
            tagged += 1;
        }
    }
    Some(tagged)
}

/// Tag a list file in place, writing it back in compact form.
pub fn tag_file(path: &Path, rules: &[TagRule]) -> Result<usize> {
    let mut doc = read_json(path)?;
    let tagged = tag_items(&mut doc, rules).ok_or_else(|| RecordsError::MissingField {
        path: path.to_path_buf(),
        field: "_list",
    })?;
    write_json_compact(path, &doc)?;
    tracing::info!(path = %path.display(), tagged, "tags updated");
    Ok(tagged)
}
