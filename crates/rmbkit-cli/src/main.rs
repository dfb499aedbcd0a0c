//! rmbkit CLI
//!
//! Command-line interface for the RMB content pipeline:
//! - Building the catalog index (`output.json`) from block templates
//! - Batch record rewrites (model-ID remap, tags, natural sort, dedup, rename)
//! - Copying material definitions next to prefabs

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

mod logging;

use rmbkit_catalog::{CatalogOptions, DEFAULT_OUTPUT_FILE, DEFAULT_START_ID};
use rmbkit_records::{RemapRules, TagRule};

#[derive(Parser)]
#[command(name = "rmbkit")]
#[command(
    author,
    version,
    about = "rmbkit: content-pipeline tools for RMB building-block records"
)]
struct Cli {
    #[command(flatten)]
    log: logging::LogArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Catalog index over `<category>-<subcategory>-<label>.json` templates.
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },

    /// Batch rewrites of block record JSON files.
    Records {
        #[command(subcommand)]
        command: RecordsCommands,
    },

    /// Custom material definitions for prefabs.
    Materials {
        #[command(subcommand)]
        command: MaterialsCommands,
    },
}

#[derive(Subcommand)]
enum CatalogCommands {
    /// Walk ROOT for templates and write the catalog (`list` + `templates`).
    Build {
        /// Directory to search recursively
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Output catalog JSON
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
        out: PathBuf,
        /// ID given to the first template
        #[arg(long, default_value_t = DEFAULT_START_ID)]
        start_id: u64,
        /// Skip templates that are not valid JSON instead of failing
        #[arg(long)]
        skip_invalid_json: bool,
    },
}

#[derive(Subcommand)]
enum RecordsCommands {
    /// Rewrite `ModelId`/`ModelIdNum` of exterior object records by numeric range.
    Remap {
        /// Directory to search recursively
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Rules file (`{"rules": [...]}`)
        #[arg(long, conflicts_with = "preset", required_unless_present = "preset")]
        rules: Option<PathBuf>,
        /// Built-in rule set (roof-fix, type-db-bricks, type-fb)
        #[arg(long)]
        preset: Option<String>,
    },

    /// Set `Tags` on `_list` items from the last digit(s) of their `ID`.
    Tag {
        /// List file containing `_list`
        file: PathBuf,
        /// Suffix mapping as SUFFIX=TAG (repeatable; default 1=dirt 2=grass 3=rock)
        #[arg(long = "map", value_name = "SUFFIX=TAG")]
        map: Vec<String>,
    },

    /// Sort `_list` items by `Label` in natural order.
    SortLabels {
        /// List file containing `_list`
        file: PathBuf,
    },

    /// Sort the `Files` array in natural order.
    SortFiles {
        /// JSON file containing `Files`
        file: PathBuf,
    },

    /// Delete byte-identical `.json` files in a directory (first one by name is kept).
    Dedupe {
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Report duplicates without deleting them
        #[arg(long)]
        dry_run: bool,
    },

    /// Rename each `.json` record to the `ModelId` of its first exterior object.
    RenameByModel {
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Report renames without performing them
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum MaterialsCommands {
    /// Copy SOURCE to `<prefab>.json` for every `*.prefab` in DIR.
    Copy {
        /// Material definition to duplicate
        #[arg(long)]
        source: PathBuf,
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Only prefabs whose name ends with one of these characters (repeatable)
        #[arg(long = "suffix", value_name = "CHAR")]
        suffixes: Vec<char>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log);

    match cli.command {
        Commands::Catalog { command } => match command {
            CatalogCommands::Build {
                root,
                out,
                start_id,
                skip_invalid_json,
            } => {
                let options = CatalogOptions {
                    start_id,
                    skip_invalid_json,
                    output_path: Some(out.clone()),
                };
                cmd_catalog_build(&root, &out, &options)?;
            }
        },
        Commands::Records { command } => match command {
            RecordsCommands::Remap {
                root,
                rules,
                preset,
            } => {
                cmd_remap(&root, rules.as_deref(), preset.as_deref())?;
            }
            RecordsCommands::Tag { file, map } => {
                cmd_tag(&file, &map)?;
            }
            RecordsCommands::SortLabels { file } => {
                let count = rmbkit_records::sort_labels(&file)
                    .with_context(|| format!("sorting {}", file.display()))?;
                println!("{} {} items by label", "Sorted".green().bold(), count);
                println!("  {} {}", "→".cyan(), file.display());
            }
            RecordsCommands::SortFiles { file } => {
                let count = rmbkit_records::sort_files(&file)
                    .with_context(|| format!("sorting {}", file.display()))?;
                println!("{} {} files", "Sorted".green().bold(), count);
                println!("  {} {}", "→".cyan(), file.display());
            }
            RecordsCommands::Dedupe { dir, dry_run } => {
                cmd_dedupe(&dir, dry_run)?;
            }
            RecordsCommands::RenameByModel { dir, dry_run } => {
                cmd_rename_by_model(&dir, dry_run)?;
            }
        },
        Commands::Materials { command } => match command {
            MaterialsCommands::Copy {
                source,
                dir,
                suffixes,
            } => {
                cmd_materials_copy(&dir, &source, &suffixes)?;
            }
        },
    }

    Ok(())
}

fn cmd_catalog_build(root: &Path, out: &Path, options: &CatalogOptions) -> Result<()> {
    println!("{} catalog {}", "Building".green().bold(), root.display());

    let report = rmbkit_catalog::build_catalog(root, options)
        .with_context(|| format!("building catalog from {}", root.display()))?;
    for skipped in &report.skipped {
        tracing::info!(path = %skipped.path.display(), reason = %skipped.reason, "skipped");
    }
    rmbkit_catalog::write_catalog(out, &report.catalog)
        .with_context(|| format!("writing {}", out.display()))?;

    println!(
        "  {} {} templates ({} skipped)",
        "→".yellow(),
        report.catalog.list.len(),
        report.skipped.len()
    );
    println!("  {} Output written to {}", "→".cyan(), out.display());
    Ok(())
}

fn cmd_remap(root: &Path, rules_path: Option<&Path>, preset: Option<&str>) -> Result<()> {
    let rules = match (rules_path, preset) {
        (Some(path), _) => RemapRules::load(path)
            .with_context(|| format!("loading rules {}", path.display()))?,
        (None, Some(name)) => RemapRules::preset(name).with_context(|| {
            let known: Vec<&str> = RemapRules::preset_names().collect();
            format!("known presets: {}", known.join(", "))
        })?,
        (None, None) => return Err(anyhow!("pass --rules <FILE> or --preset <NAME>")),
    };

    println!(
        "{} model IDs under {} ({} rules)",
        "Remapping".green().bold(),
        root.display(),
        rules.rules.len()
    );
    let stats = rmbkit_records::remap_tree(root, &rules)
        .with_context(|| format!("remapping {}", root.display()))?;
    println!(
        "  {} {} of {} files updated ({} records)",
        "→".yellow(),
        stats.files_updated,
        stats.files_scanned,
        stats.records_updated
    );
    Ok(())
}

fn cmd_tag(file: &Path, map: &[String]) -> Result<()> {
    let rules = if map.is_empty() {
        rmbkit_records::default_tag_rules()
    } else {
        map.iter()
            .map(|mapping| {
                TagRule::parse(mapping)
                    .ok_or_else(|| anyhow!("invalid --map `{mapping}` (expected SUFFIX=TAG)"))
            })
            .collect::<Result<Vec<_>>>()?
    };

    let tagged = rmbkit_records::tag_file(file, &rules)
        .with_context(|| format!("tagging {}", file.display()))?;
    println!("{} {} items", "Tagged".green().bold(), tagged);
    println!("  {} Tags updated in {}", "→".cyan(), file.display());
    Ok(())
}

fn cmd_dedupe(dir: &Path, dry_run: bool) -> Result<()> {
    let report = rmbkit_records::dedupe_dir(dir, dry_run)
        .with_context(|| format!("deduplicating {}", dir.display()))?;
    let verb = if dry_run { "Would delete" } else { "Deleted" };
    for (removed, original) in &report.removed {
        println!(
            "  {} {} duplicate {} (same as {})",
            "→".cyan(),
            verb,
            removed.display(),
            original.display()
        );
    }
    println!(
        "{} {} kept, {} duplicates",
        "Deduplicated".green().bold(),
        report.kept.len(),
        report.removed.len()
    );
    Ok(())
}

fn cmd_rename_by_model(dir: &Path, dry_run: bool) -> Result<()> {
    let report = rmbkit_records::rename_by_model(dir, dry_run)
        .with_context(|| format!("renaming records in {}", dir.display()))?;
    for (from, to) in &report.renamed {
        println!("  {} {} → {}", "→".cyan(), from.display(), to.display());
    }
    for (path, reason) in &report.failures {
        println!("  {} {}: {}", "!".red(), path.display(), reason);
    }
    println!(
        "{} {} renamed, {} unchanged, {} failed{}",
        "Renamed".green().bold(),
        report.renamed.len(),
        report.unchanged.len(),
        report.failures.len(),
        if dry_run { " (dry run)" } else { "" }
    );
    Ok(())
}

fn cmd_materials_copy(dir: &Path, source: &Path, suffixes: &[char]) -> Result<()> {
    let written = rmbkit_records::copy_materials(dir, source, suffixes)
        .with_context(|| format!("copying {} into {}", source.display(), dir.display()))?;
    for target in &written {
        println!("  {} {}", "→".cyan(), target.display());
    }
    println!("{} {} material files", "Copied".green().bold(), written.len());
    Ok(())
}
