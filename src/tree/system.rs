//! Real filesystem paths as tree items

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};

use super::node::TreeItem;

/// A path on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemNode {
    path: PathBuf,
}

impl SystemNode {
    /// Resolve `path` (see [`resolve_path`]) and wrap it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            path: resolve_path(path)?,
        })
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

impl TreeItem for SystemNode {
    fn name(&self) -> String {
        match self.path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            // The filesystem root has no final segment
            None => self.path.display().to_string(),
        }
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn is_folder(&self) -> bool {
        self.path.is_dir()
    }

    /// Directory entries sorted by file name.
    fn children(&self) -> Result<Vec<Self>> {
        let listing_err = |source: io::Error| Error::Listing {
            path: self.path.clone(),
            source,
        };
        let mut entries = fs::read_dir(&self.path)
            .map_err(listing_err)?
            .collect::<io::Result<Vec<_>>>()
            .map_err(listing_err)?;
        entries.sort_by_key(|entry| entry.file_name());

        Ok(entries
            .into_iter()
            .map(|entry| SystemNode { path: entry.path() })
            .collect())
    }
}

/// Expand a leading `~`, anchor relative paths at the working directory and
/// canonicalize the result, resolving `.`, `..` and symlinks.
pub fn resolve_path(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let io_err = |source: io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let expanded = match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir().ok_or_else(|| {
                Error::config(format!(
                    "cannot expand '{}': home directory unknown",
                    path.display()
                ))
            })?;
            home.join(rest)
        }
        Err(_) => path.to_path_buf(),
    };
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir().map_err(io_err)?.join(expanded)
    };

    let resolved = absolute.canonicalize().map_err(io_err)?;
    debug!("resolved {} to {}", path.display(), resolved.display());
    Ok(resolved)
}
