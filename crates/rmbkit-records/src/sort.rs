//! Natural ("human") ordering for list files.
//!
//! `item9` sorts before `item10`: names are lowercased and split into runs of
//! text and digits, and digit runs compare by value.

use crate::error::{RecordsError, Result};
use crate::json_io::{read_json, write_json_pretty};
use serde_json::Value;
use std::cmp::Ordering;
use std::path::Path;

/// A run of ASCII digits, compared by numeric value.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Digits(String);

impl Digits {
    fn new(run: &str) -> Self {
        let trimmed = run.trim_start_matches('0');
        Digits(trimmed.to_string())
    }
}

impl Ord for Digits {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Digits {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Chunk {
    Text(String),
    Number(Digits),
}

/// Sort key for natural ordering.
///
/// Always alternates text, number, text, ... starting with a (possibly empty)
/// text run, so two keys line up chunk for chunk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Chunk>);

pub fn natural_key(s: &str) -> NaturalKey {
    let lower = s.to_lowercase();
    let mut chunks = Vec::new();
    let mut text = String::new();
    let mut digits = String::new();
    for c in lower.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else {
            if !digits.is_empty() {
                chunks.push(Chunk::Text(std::mem::take(&mut text)));
                chunks.push(Chunk::Number(Digits::new(&std::mem::take(&mut digits))));
            }
            text.push(c);
        }
    }
    if !digits.is_empty() {
        chunks.push(Chunk::Text(std::mem::take(&mut text)));
        chunks.push(Chunk::Number(Digits::new(&digits)));
    }
    chunks.push(Chunk::Text(text));
    NaturalKey(chunks)
}

/// Sort `_list` items by the natural order of their `Label`.
pub fn sort_labels_in(doc: &mut Value) -> Option<usize> {
    let items = doc.get_mut("_list")?.as_array_mut()?;
    items.sort_by_cached_key(|item| {
        natural_key(item.get("Label").and_then(Value::as_str).unwrap_or(""))
    });
    Some(items.len())
}

/// Sort the `Files` string array in natural order.
pub fn sort_files_in(doc: &mut Value) -> Option<usize> {
    let files = doc.get_mut("Files")?.as_array_mut()?;
    files.sort_by_cached_key(|file| natural_key(file.as_str().unwrap_or("")));
    Some(files.len())
}

fn sort_file_with(
    path: &Path,
    field: &'static str,
    sort: fn(&mut Value) -> Option<usize>,
) -> Result<usize> {
    let mut doc = read_json(path)?;
    let count = sort(&mut doc).ok_or_else(|| RecordsError::MissingField {
        path: path.to_path_buf(),
        field,
    })?;
    write_json_pretty(path, &doc)?;
    tracing::info!(path = %path.display(), field, count, "sorted");
    Ok(count)
}

/// Rewrite a list file with `_list` in natural `Label` order.
pub fn sort_labels(path: &Path) -> Result<usize> {
    sort_file_with(path, "_list", sort_labels_in)
}

/// Rewrite a file with its `Files` array in natural order.
pub fn sort_files(path: &Path) -> Result<usize> {
    sort_file_with(path, "Files", sort_files_in)
}
