//! Error types for reading the documentation tree.

use std::fmt;
use std::path::PathBuf;

/// Why a requested page path was refused before any file was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPathReason {
    /// The normalized path escapes the documentation root.
    OutsideRoot,
    /// The path does not name a markdown file.
    NotMarkdown,
}

impl fmt::Display for InvalidPathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutsideRoot => f.write_str("request for page outside of docs folder"),
            Self::NotMarkdown => f.write_str("request for page should have markdown extension"),
        }
    }
}

/// Error returned by page reads and menu builds.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Path rejected by the containment or extension check.
    #[error("{reason}: {path}")]
    InvalidPath {
        /// Path as requested.
        path: String,
        /// Which check refused it.
        reason: InvalidPathReason,
    },

    /// Filesystem access failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying error, unchanged.
        #[source]
        source: std::io::Error,
    },

    /// The leading front-matter block could not be parsed.
    #[error("invalid front matter in {path}: {message}")]
    FrontMatter {
        /// Page path.
        path: String,
        /// Parser message.
        message: String,
    },
}

impl SiteError {
    /// The path-check failure reason, if this is an `InvalidPath` error.
    #[must_use]
    pub fn invalid_path_reason(&self) -> Option<InvalidPathReason> {
        match self {
            Self::InvalidPath { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
