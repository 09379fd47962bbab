//! Error types shared by the tree sources, the formatter and the parser

use std::io;
use std::path::PathBuf;

/// Errors produced while building, reading or rendering folder trees.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unknown style, invalid option value or missing optional capability.
    #[error("configuration error: {0}")]
    Config(String),

    /// A folder could not be enumerated (or a file was asked for children).
    #[error("cannot list '{}': {source}", path.display())]
    Listing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Path-string indexing into a mock tree missed a segment.
    #[error("path \"{path}\" not found through {root}")]
    Lookup { path: String, root: String },

    /// An indented text diagram could not be mapped onto a tree.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Mock tree misuse: name collisions, cycles, files used as parents.
    #[error("invalid tree operation: {0}")]
    Tree(String),

    /// Filesystem failure outside of directory listing.
    #[error("'{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub(crate) fn tree(message: impl Into<String>) -> Self {
        Self::Tree(message.into())
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// The I/O error kind behind a listing failure, if this is one.
    pub fn listing_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Listing { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
