//! The listable-node capability shared by real and mock trees

use std::path::{Path, PathBuf};

use crate::error::Result;

/// A node the formatter can walk: a real path or a mock tree item.
pub trait TreeItem: Clone {
    /// Final path segment.
    fn name(&self) -> String;

    /// Path identifying the node, handed to masks and formatter callbacks.
    fn path(&self) -> PathBuf;

    fn is_folder(&self) -> bool;

    /// Ordered children of a folder. Files and unreadable folders fail with
    /// [`Error::Listing`](crate::Error::Listing).
    fn children(&self) -> Result<Vec<Self>>;
}

/// Borrowed view of an item passed to masks and formatter callbacks.
#[derive(Debug, Clone, Copy)]
pub struct ItemRef<'a> {
    pub name: &'a str,
    pub path: &'a Path,
    pub is_folder: bool,
    /// Distance from the render root.
    pub depth: usize,
}

/// A child that has been listed, with the properties the policies look at
/// computed once.
#[derive(Debug, Clone)]
pub(crate) struct Candidate<N> {
    pub name: String,
    pub path: PathBuf,
    pub is_folder: bool,
    pub node: N,
}

impl<N: TreeItem> Candidate<N> {
    pub fn new(node: N) -> Self {
        Self {
            name: node.name(),
            path: node.path(),
            is_folder: node.is_folder(),
            node,
        }
    }
}

impl<N> Candidate<N> {
    pub fn item(&self, depth: usize) -> ItemRef<'_> {
        ItemRef {
            name: &self.name,
            path: &self.path,
            is_folder: self.is_folder,
            depth,
        }
    }
}
