use std::path::PathBuf;

use thiserror::Error;

/// Main error type for trecdex operations
#[derive(Error, Debug)]
pub enum TrecdexError {
    #[error("Corpus directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to read corpus file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed corpus XML{} at byte {position}: {message}", display_path(.path))]
    MalformedCorpusXml {
        path: Option<PathBuf>,
        position: u64,
        message: String,
    },

    #[error("Index I/O error: {0}")]
    IndexIo(String),

    #[error("Index at {0} is locked by another writer")]
    IndexLocked(PathBuf),

    #[error("No committed index found at {0}")]
    IndexNotFound(PathBuf),

    #[error("Index corrupted: {0}")]
    Corrupted(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Metadata error: {0}")]
    Json(#[from] serde_json::Error),
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" in {}", p.display()),
        None => String::new(),
    }
}

/// Result type alias for trecdex operations
pub type Result<T> = std::result::Result<T, TrecdexError>;

impl TrecdexError {
    /// Whether this error came from reading the corpus rather than from the index
    pub fn is_corpus_error(&self) -> bool {
        matches!(
            self,
            TrecdexError::DirectoryNotFound(_)
                | TrecdexError::FileRead { .. }
                | TrecdexError::MalformedCorpusXml { .. }
        )
    }

    /// Whether this error is a corpus parse failure
    pub fn is_parse_error(&self) -> bool {
        matches!(self, TrecdexError::MalformedCorpusXml { .. })
    }

    /// Attach the offending file to a parse error raised before the path was known
    pub fn with_path(self, file: impl Into<PathBuf>) -> Self {
        match self {
            TrecdexError::MalformedCorpusXml {
                path: None,
                position,
                message,
            } => TrecdexError::MalformedCorpusXml {
                path: Some(file.into()),
                position,
                message,
            },
            other => other,
        }
    }
}
