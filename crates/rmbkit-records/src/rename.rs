//! Rename record files after the model of their first exterior object.

use crate::error::{RecordsError, Result};
use crate::json_io::{list_json_files, read_json};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const FIRST_MODEL_ID: &str = "/RmbSubRecord/Exterior/Block3dObjectRecords/0/ModelId";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameReport {
    pub renamed: Vec<(PathBuf, PathBuf)>,
    /// Files already carrying their target name.
    pub unchanged: Vec<PathBuf>,
    /// Files that could not be renamed, with the reason.
    pub failures: Vec<(PathBuf, String)>,
}

/// The first exterior object's `ModelId` as a file-name-safe string.
pub fn first_model_id(doc: &Value) -> Option<String> {
    let id = match doc.pointer(FIRST_MODEL_ID)? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let safe = !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\', ':']);
    safe.then_some(id)
}

/// Candidate names for `base`: `base.json`, `base-01.json`, `base-02.json`, ...
fn candidate_name(base: &str, attempt: usize) -> String {
    if attempt == 0 {
        format!("{base}.json")
    } else {
        format!("{base}-{attempt:02}.json")
    }
}

/// Rename every `.json` file in `dir` to `<ModelId>.json`, adding a `-NN`
/// counter when the name is taken. Per-file problems are collected in the
/// report and do not stop the run.
pub fn rename_by_model(dir: &Path, dry_run: bool) -> Result<RenameReport> {
    let mut report = RenameReport::default();
    // Names taken or freed by this run (matters for dry runs, where nothing moves).
    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut vacated: HashSet<PathBuf> = HashSet::new();

    for path in list_json_files(dir)? {
        let doc = match read_json(&path) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "error processing file");
                report.failures.push((path, err.to_string()));
                continue;
            }
        };
        let Some(model_id) = first_model_id(&doc) else {
            let err = RecordsError::MissingField {
                path: path.clone(),
                field: "ModelId",
            };
            tracing::warn!(path = %path.display(), error = %err, "error processing file");
            report.failures.push((path, err.to_string()));
            continue;
        };

        let taken = |candidate: &PathBuf| {
            claimed.contains(candidate) || (candidate.exists() && !vacated.contains(candidate))
        };
        let mut target = None;
        for attempt in 0.. {
            let candidate = dir.join(candidate_name(&model_id, attempt));
            if candidate == path {
                break;
            }
            if !taken(&candidate) {
                target = Some(candidate);
                break;
            }
        }

        let Some(target) = target else {
            report.unchanged.push(path);
            continue;
        };
        if !dry_run {
            fs::rename(&path, &target).map_err(RecordsError::io(&path))?;
        }
        tracing::info!(from = %path.display(), to = %target.display(), dry_run, "renamed");
        claimed.insert(target.clone());
        claimed.remove(&path);
        vacated.insert(path.clone());
        report.renamed.push((path, target));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(model_id: Value) -> String {
        json!({"RmbSubRecord": {"Exterior": {"Block3dObjectRecords": [{"ModelId": model_id}]}}})
            .to_string()
    }

    #[test]
    fn model_id_extraction() {
        let doc: Value = serde_json::from_str(&record(json!("52001"))).unwrap();
        assert_eq!(first_model_id(&doc), Some("52001".to_string()));
        let doc: Value = serde_json::from_str(&record(json!(52001))).unwrap();
        assert_eq!(first_model_id(&doc), Some("52001".to_string()));
        let doc: Value = serde_json::from_str(&record(json!("../x"))).unwrap();
        assert_eq!(first_model_id(&doc), None);
        assert_eq!(first_model_id(&json!({"RmbSubRecord": {}})), None);
    }

    #[test]
    fn collisions_get_counters() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.json"), record(json!("300"))).unwrap();
        fs::write(root.join("b.json"), record(json!("300"))).unwrap();
        fs::write(root.join("c.json"), record(json!("300"))).unwrap();
        fs::write(root.join("d.json"), "{}").unwrap();

        let report = rename_by_model(root, false).unwrap();
        let targets: Vec<String> = report
            .renamed
            .iter()
            .map(|(_, to)| to.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(targets, vec!["300.json", "300-01.json", "300-02.json"]);
        assert_eq!(report.failures.len(), 1);
        assert!(root.join("d.json").exists());
        assert!(!root.join("a.json").exists());
    }

    #[test]
    fn already_named_files_stay_put() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("300.json"), record(json!("300"))).unwrap();

        let report = rename_by_model(root, false).unwrap();
        assert!(report.renamed.is_empty());
        assert_eq!(report.unchanged, vec![root.join("300.json")]);
    }

    #[test]
    fn dry_run_plans_without_moving() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.json"), record(json!("7"))).unwrap();
        fs::write(root.join("b.json"), record(json!("7"))).unwrap();

        let report = rename_by_model(root, true).unwrap();
        assert_eq!(
            report.renamed,
            vec![
                (root.join("a.json"), root.join("7.json")),
                (root.join("b.json"), root.join("7-01.json")),
            ]
        );
        assert!(root.join("a.json").exists());
        assert!(!root.join("7.json").exists());
    }
}
