//! Error types for wikidict operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while converting pages.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("input is not valid UTF-8")]
    InvalidUtf8,

    #[error("document has no markup")]
    EmptyDocument,

    #[error("no section found for language {0:?}")]
    LanguageNotFound(String),

    #[error("language section has no definitions")]
    NoDefinitions,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Why a single input file contributed no entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipKind {
    /// Unreadable, undecodable or empty file.
    ParseFailure,
    /// No language section, or nothing survived extraction.
    NotFound,
}

impl Error {
    /// Classify per-file failures. Returns `None` for errors that should
    /// abort a run (configuration, JSON, worker pool).
    pub fn skip_kind(&self) -> Option<SkipKind> {
        match self {
            Error::Io(_) | Error::NotAFile(_) | Error::InvalidUtf8 | Error::EmptyDocument => {
                Some(SkipKind::ParseFailure)
            }
            Error::LanguageNotFound(_) | Error::NoDefinitions => Some(SkipKind::NotFound),
            Error::Json(_) | Error::Config(_) | Error::ThreadPool(_) => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        self.skip_kind().is_some()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
