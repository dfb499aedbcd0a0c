//! Integration tests for the complete rmbkit pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - Records remap → Catalog build
//! - Catalog build → tagging and natural sort of the catalog list
//!
//! Run with: cargo test --test integration_tests

use std::fs;
use std::path::Path;

use rmbkit_catalog::{build_catalog, write_catalog, CatalogOptions};
use rmbkit_records::{remap_tree, sort_labels, tag_file, RemapRules, TagRule};
use serde_json::{json, Value};
use tempfile::tempdir;

fn write_json(path: &Path, value: &Value) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

fn block(model_id: &str, y: i64) -> Value {
    json!({
        "RmbSubRecord": {
            "Exterior": {
                "Block3dObjectRecords": [
                    {
                        "ModelId": model_id,
                        "ModelIdNum": model_id.parse::<u64>().unwrap(),
                        "YPos": y,
                        "ZPos": 0
                    }
                ]
            }
        }
    })
}

// ============================================================================
// Remap → Catalog
// ============================================================================

#[test]
fn test_remapped_templates_land_in_catalog() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_json(&root.join("roofs/roofs-flat-tin.json"), &block("2040", -10));
    write_json(&root.join("roofs/roofs-flat-slate.json"), &block("2003", 0));
    write_json(&root.join("walls/walls-small-brick.json"), &block("3100", 0));

    let rules = RemapRules::preset("roof-fix").unwrap();
    let stats = remap_tree(root, &rules).unwrap();
    assert_eq!(stats.files_scanned, 3);
    // Only ModelIdNum is targeted; 2003 is rewritten but exempt from the shift.
    assert_eq!(stats.files_updated, 2);

    let report = build_catalog(root, &CatalogOptions::default()).unwrap();
    let catalog = report.catalog;
    assert!(report.skipped.is_empty());
    assert!(catalog.ids_consistent());
    assert!(catalog.is_sorted());

    // Discovery order: roofs/ (slate, tin), then walls/.
    let slate = &catalog.templates["3000"]["RmbSubRecord"]["Exterior"]["Block3dObjectRecords"][0];
    assert_eq!(slate["ModelIdNum"], 2803);
    assert_eq!(slate["ModelId"], "2003");
    assert_eq!(slate["YPos"], 0);

    let tin = &catalog.templates["3001"]["RmbSubRecord"]["Exterior"]["Block3dObjectRecords"][0];
    assert_eq!(tin["ModelIdNum"], 2840);
    assert_eq!(tin["YPos"], 118);
    assert_eq!(tin["ZPos"], -128);

    let subcategories: Vec<&str> = catalog.list.iter().map(|e| e.subcategory.as_str()).collect();
    assert_eq!(subcategories, vec!["flat [2]", "flat [2]", "small [1]"]);
}

// ============================================================================
// Catalog → tag / sort
// ============================================================================

#[test]
fn test_catalog_list_can_be_tagged_and_sorted() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("blocks");
    write_json(&root.join("hills-grass-Hill 10.json"), &json!({}));
    write_json(&root.join("hills-grass-Hill 2.json"), &json!({}));
    write_json(&root.join("hills-grass-Hill 1.json"), &json!({}));

    let out = dir.path().join("catalog.json");
    let report = build_catalog(&root, &CatalogOptions::default()).unwrap();
    write_catalog(&out, &report.catalog).unwrap();

    // The tools operate on `_list`; derive such a file from the catalog.
    let catalog: Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
    let list_file = dir.path().join("list.json");
    write_json(&list_file, &json!({"_list": catalog["list"].clone()}));

    let rules = vec![
        TagRule::new("0", "base"),
        TagRule::new("1", "dirt"),
        TagRule::new("2", "grass"),
    ];
    assert_eq!(tag_file(&list_file, &rules).unwrap(), 3);
    assert_eq!(sort_labels(&list_file).unwrap(), 3);

    let sorted: Value = serde_json::from_slice(&fs::read(&list_file).unwrap()).unwrap();
    let labels: Vec<&str> = sorted["_list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["Label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Hill 1", "Hill 2", "Hill 10"]);

    // Name order gives Hill 1 → 3000, Hill 10 → 3001, Hill 2 → 3002.
    let tags: Vec<&str> = sorted["_list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["Tags"].as_str().unwrap())
        .collect();
    assert_eq!(tags, vec!["base", "grass", "dirt"]);
}

#[test]
fn test_catalog_rebuild_over_own_output_is_stable() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_json(&root.join("walls-small-brick.json"), &json!({"Name": "brick"}));
    let out = root.join("cat-alog-out.json");

    let options = CatalogOptions {
        output_path: Some(out.clone()),
        ..CatalogOptions::default()
    };
    let first = build_catalog(root, &options).unwrap();
    write_catalog(&out, &first.catalog).unwrap();
    let first_bytes = fs::read(&out).unwrap();

    let options = CatalogOptions {
        output_path: Some(out.clone()),
        ..CatalogOptions::default()
    };
    let second = build_catalog(root, &options).unwrap();
    assert_eq!(second.catalog.list.len(), 1);
    write_catalog(&out, &second.catalog).unwrap();
    assert_eq!(fs::read(&out).unwrap(), first_bytes);
}
