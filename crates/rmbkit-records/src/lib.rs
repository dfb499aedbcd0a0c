//! Batch rewrites for RMB building-block records.
//!
//! Each module is one standalone job over a directory or file of JSON records:
//! - [`remap`]: rewrite model IDs by numeric range (optionally shifting position)
//! - [`tag`]: assign terrain tags from the ID suffix
//! - [`sort`]: natural ordering of `_list` labels and `Files` entries
//! - [`dedupe`]: drop byte-identical record files
//! - [`rename`]: rename records after their first exterior model
//! - [`materials`]: copy a material definition next to each prefab

pub mod dedupe;
pub mod error;
pub mod json_io;
pub mod materials;
pub mod remap;
pub mod rename;
pub mod sort;
pub mod tag;

pub use dedupe::{dedupe_dir, DedupeReport};
pub use error::{RecordsError, Result};
pub use materials::copy_materials;
pub use remap::{remap_file, remap_tree, RemapRule, RemapRules, RemapStats, RemapTarget};
pub use rename::{rename_by_model, RenameReport};
pub use sort::{natural_key, sort_files, sort_labels};
pub use tag::{default_tag_rules, tag_file, TagRule};
