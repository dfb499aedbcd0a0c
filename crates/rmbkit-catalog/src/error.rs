use std::path::PathBuf;

/// Errors that abort a catalog build.
///
/// Every variant names the file it was raised for so the CLI can point the
/// user at the offending template.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("search root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no IDs left for {}: the previous template used u64::MAX", .path.display())]
    IdsExhausted { path: PathBuf },
    #[error("failed to serialize catalog: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
