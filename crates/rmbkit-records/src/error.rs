use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RecordsError {
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("IO error on {}: {source}", .path.display())]
    Io {
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
    #[error("{}: missing or malformed `{field}`", .path.display())]
    MissingField { path: PathBuf, field: &'static str },
    #[error("invalid remap rule #{index}: {reason}")]
    InvalidRule { index: usize, reason: String },
    #[error("unknown remap preset `{0}`")]
    UnknownPreset(String),
}

impl RecordsError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| RecordsError::Io { path, source }
    }
}

pub type Result<T> = std::result::Result<T, RecordsError>;
