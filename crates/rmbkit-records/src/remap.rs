//! Model-ID remapping for block 3D object records.
//!
//! Walks every `.json` record under a root and rewrites the `ModelId` /
//! `ModelIdNum` of each entry in `RmbSubRecord.Exterior.Block3dObjectRecords`
//! according to a list of [`RemapRule`]s. A rule matches IDs in an inclusive
//! numeric range and replaces their leading digits, e.g. `204xx -> 201xx`.
//! Rules may also nudge the record's position when they fire.

use crate::error::{RecordsError, Result};
use crate::json_io::{read_json, walk_json_files, write_json_pretty};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Which ID field(s) a rule rewrites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemapTarget {
    /// The string `ModelId` field.
    ModelId,
    /// The integer `ModelIdNum` field.
    ModelIdNum,
    #[default]
    Both,
}

impl RemapTarget {
    fn covers_model_id(self) -> bool {
        matches!(self, RemapTarget::ModelId | RemapTarget::Both)
    }

    fn covers_model_id_num(self) -> bool {
        matches!(self, RemapTarget::ModelIdNum | RemapTarget::Both)
    }
}

/// Offset added to `YPos` / `ZPos` when a rule rewrites `ModelIdNum`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionShift {
    #[serde(default)]
    pub y: i64,
    #[serde(default)]
    pub z: i64,
}

/// A single ID or an inclusive `[lo, hi]` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdSpan {
    Single(u64),
    Range([u64; 2]),
}

impl IdSpan {
    pub fn contains(self, id: u64) -> bool {
        match self {
            IdSpan::Single(single) => single == id,
            IdSpan::Range([lo, hi]) => lo <= id && id <= hi,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapRule {
    /// Smallest matching ID (inclusive).
    pub min: u64,
    /// Largest matching ID (inclusive).
    pub max: u64,
    /// How many leading digits are replaced.
    pub prefix_len: usize,
    /// Digits written in place of the replaced prefix.
    pub replacement: String,
    #[serde(default)]
    pub target: RemapTarget,
    #[serde(default)]
    pub shift: Option<PositionShift>,
    /// IDs that are rewritten but never shifted.
    #[serde(default)]
    pub exempt: Vec<IdSpan>,
}

impl RemapRule {
    fn validate(&self, index: usize) -> Result<()> {
        let invalid = |reason: String| RecordsError::InvalidRule { index, reason };
        if self.min > self.max {
            return Err(invalid(format!("min {} exceeds max {}", self.min, self.max)));
        }
        if self.prefix_len == 0 {
            return Err(invalid("prefix_len must be at least 1".to_string()));
        }
        if self.replacement.is_empty() || !self.replacement.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(format!(
                "replacement `{}` must be a non-empty digit string",
                self.replacement
            )));
        }
        Ok(())
    }

    pub fn matches(&self, id: u64) -> bool {
        self.min <= id && id <= self.max
    }

    pub fn is_exempt(&self, id: u64) -> bool {
        self.exempt.iter().any(|span| span.contains(id))
    }

    /// Rewrite a canonical decimal ID string, or `None` when the rule does not apply.
    pub fn rewrite_digits(&self, digits: &str) -> Option<String> {
        let id = parse_canonical_id(digits)?;
        if !self.matches(id) || digits.len() < self.prefix_len {
            return None;
        }
        Some(format!("{}{}", self.replacement, &digits[self.prefix_len..]))
    }

    pub fn rewrite(&self, id: u64) -> Option<u64> {
        self.rewrite_digits(&id.to_string())?.parse().ok()
    }
}

/// Digits only, no sign, no leading zeros (except `"0"` itself).
fn parse_canonical_id(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if text.len() > 1 && text.starts_with('0') {
        return None;
    }
    text.parse().ok()
}

/// An ordered rule list; the first rule matching a field wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapRules {
    pub rules: Vec<RemapRule>,
}

const PRESETS: &[(&str, &str)] = &[
    ("roof-fix", include_str!("../presets/roof-fix.json")),
    ("type-db-bricks", include_str!("../presets/type-db-bricks.json")),
    ("type-fb", include_str!("../presets/type-fb.json")),
];

impl RemapRules {
    pub fn validate(&self) -> Result<()> {
        for (index, rule) in self.rules.iter().enumerate() {
            rule.validate(index)?;
        }
        Ok(())
    }

    pub fn from_json_str(text: &str, origin: &Path) -> Result<Self> {
        let rules: RemapRules = serde_json::from_str(text).map_err(|source| RecordsError::Json {
            path: origin.to_path_buf(),
            source,
        })?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load and validate a rules file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(RecordsError::io(path))?;
        Self::from_json_str(&text, path)
    }

    /// Names of the built-in rule sets.
    pub fn preset_names() -> impl Iterator<Item = &'static str> {
        PRESETS.iter().map(|(name, _)| *name)
    }

    pub fn preset(name: &str) -> Result<Self> {
        let (_, text) = PRESETS
            .iter()
            .find(|(preset, _)| *preset == name)
            .ok_or_else(|| RecordsError::UnknownPreset(name.to_string()))?;
        Self::from_json_str(text, Path::new(name))
    }

    /// Apply the rules to one object record. Returns true if anything changed.
    pub fn apply_to_record(&self, record: &mut Map<String, Value>) -> bool {
        let mut changed = false;

        if let Some(num) = record.get("ModelIdNum").and_then(Value::as_u64) {
            let hit = self
                .rules
                .iter()
                .find(|r| r.target.covers_model_id_num() && r.matches(num));
            if let Some(rule) = hit {
                if let Some(new_num) = rule.rewrite(num) {
                    if new_num != num {
                        record.insert("ModelIdNum".to_string(), Value::from(new_num));
                        changed = true;
                    }
                }
                if let Some(shift) = rule.shift.filter(|_| !rule.is_exempt(num)) {
                    changed |= shift_field(record, "YPos", shift.y);
                    changed |= shift_field(record, "ZPos", shift.z);
                }
            }
        }

        let new_model_id = record.get("ModelId").and_then(Value::as_str).and_then(|text| {
            let id = parse_canonical_id(text)?;
            let rule = self
                .rules
                .iter()
                .find(|r| r.target.covers_model_id() && r.matches(id))?;
            rule.rewrite_digits(text).filter(|new| new != text)
        });
        if let Some(new_model_id) = new_model_id {
            record.insert("ModelId".to_string(), Value::String(new_model_id));
            changed = true;
        }

        changed
    }

    /// Apply the rules to every exterior object record of one document.
    /// Returns the number of records changed.
    pub fn apply_to_document(&self, doc: &mut Value) -> usize {
        let Some(records) = doc
            .pointer_mut("/RmbSubRecord/Exterior/Block3dObjectRecords")
            .and_then(Value::as_array_mut)
        else {
            return 0;
        };
        records
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .map(|record| self.apply_to_record(record))
            .filter(|changed| *changed)
            .count()
    }
}

/// Add `delta` to a coordinate. A missing field is created as `delta`; a value
/// that is not a number, or would overflow, is left as it is.
fn shift_field(record: &mut Map<String, Value>, field: &str, delta: i64) -> bool {
    if delta == 0 {
        return false;
    }
    let shifted = match record.get(field) {
        None => Some(Value::from(delta)),
        Some(value) => shift_number(value, delta),
    };
    match shifted {
        Some(value) => {
            record.insert(field.to_string(), value);
            true
        }
        None => {
            tracing::warn!(field, delta, value = ?record.get(field), "coordinate not shifted");
            false
        }
    }
}

fn shift_number(value: &Value, delta: i64) -> Option<Value> {
    if let Some(n) = value.as_i64() {
        return n.checked_add(delta).map(Value::from);
    }
    if let Some(n) = value.as_u64() {
        return n.checked_add_signed(delta).map(Value::from);
    }
    value.as_f64().map(|f| Value::from(f + delta as f64))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RemapStats {
    pub files_scanned: usize,
    pub files_updated: usize,
    pub records_updated: usize,
}

impl std::ops::AddAssign for RemapStats {
    fn add_assign(&mut self, rhs: Self) {
        self.files_scanned = self.files_scanned.saturating_add(rhs.files_scanned);
        self.files_updated = self.files_updated.saturating_add(rhs.files_updated);
        self.records_updated = self.records_updated.saturating_add(rhs.records_updated);
    }
}

/// Remap one file in place. Unchanged files are not rewritten.
pub fn remap_file(path: &Path, rules: &RemapRules) -> Result<RemapStats> {
    let mut doc = read_json(path)?;
    let records_updated = rules.apply_to_document(&mut doc);
    if records_updated > 0 {
        write_json_pretty(path, &doc)?;
        tracing::info!(path = %path.display(), records = records_updated, "updated file");
    }
    Ok(RemapStats {
        files_scanned: 1,
        files_updated: usize::from(records_updated > 0),
        records_updated,
    })
}

/// Remap every `.json` record under `root`.
///
/// A file that cannot be read or parsed is logged and left alone; the walk
/// continues with the next file.
pub fn remap_tree(root: &Path, rules: &RemapRules) -> Result<RemapStats> {
    let mut stats = RemapStats::default();
    for path in walk_json_files(root)? {
        match remap_file(&path, rules) {
            Ok(file_stats) => stats += file_stats,
            Err(err @ (RecordsError::Json { .. } | RecordsError::Io { .. })) => {
                tracing::warn!(path = %path.display(), error = %err, "error processing file");
                stats.files_scanned += 1;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(stats)
}
