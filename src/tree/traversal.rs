//! Child selection shared by the formatter and tree snapshots.
//!
//! Every folder visit runs its listing through the same pipeline, in this
//! order: mask, include/exclude patterns, sort (and `first` partition),
//! item limit. What the limit cuts away is kept aside so a beyond line can
//! describe it.

use std::cmp::Ordering;
use std::ptr;

use log::debug;

use crate::error::Result;
use crate::output::{First, ItemLimit, RenderOptions};

use super::node::{Candidate, TreeItem};
use super::utils::NameFilter;

/// Outcome of running a folder listing through the policies.
#[derive(Debug)]
pub(crate) struct Selection<N> {
    pub shown: Vec<Candidate<N>>,
    pub hidden: Vec<Candidate<N>>,
}

impl<N> Selection<N> {
    /// Folder and file counts of the items cut by the limit.
    pub fn hidden_counts(&self) -> (usize, usize) {
        let folders = self.hidden.iter().filter(|c| c.is_folder).count();
        (folders, self.hidden.len() - folders)
    }
}

/// Policies of one folder visit.
pub(crate) struct BaseTraversal<'a> {
    options: &'a RenderOptions,
    filter: NameFilter,
}

impl<'a> BaseTraversal<'a> {
    pub fn new(options: &'a RenderOptions) -> Result<Self> {
        Ok(Self {
            options,
            filter: NameFilter::new(options)?,
        })
    }

    /// Whether this traversal was built from `options` itself, not a copy.
    pub fn governs(&self, options: &RenderOptions) -> bool {
        ptr::eq(self.options, options)
    }

    /// Filter, order and limit `children`, which live at `depth`.
    ///
    /// With `cutoff` set the parent sits at the depth limit: everything that
    /// survives filtering ends up hidden.
    pub fn select<N: TreeItem>(
        &self,
        children: Vec<N>,
        depth: usize,
        cutoff: bool,
    ) -> Selection<N> {
        let listed = children.len();
        let mut kept: Vec<Candidate<N>> = children
            .into_iter()
            .map(Candidate::new)
            .filter(|c| self.passes_mask(c, depth))
            .filter(|c| self.filter.keeps(&c.name, c.is_folder))
            .collect();
        self.order(&mut kept);

        let limit = if cutoff {
            Some(ItemLimit::Total(0))
        } else {
            self.options.item_limit
        };
        let selection = apply_limit(kept, limit);
        debug!(
            "depth {}: {} listed, {} shown, {} hidden",
            depth,
            listed,
            selection.shown.len(),
            selection.hidden.len()
        );
        selection
    }

    fn passes_mask<N>(&self, candidate: &Candidate<N>, depth: usize) -> bool {
        self.options
            .mask
            .as_ref()
            .is_none_or(|mask| mask(&candidate.item(depth)))
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        let ordering = match self.options.sort_key {
            Some(ref key) => key.compare(a, b),
            None => a.cmp(b),
        };
        if self.options.sort_reverse {
            ordering.reverse()
        } else {
            ordering
        }
    }

    fn order<N>(&self, items: &mut [Candidate<N>]) {
        if self.options.sort {
            items.sort_by(|a, b| self.compare(&a.name, &b.name));
        }
        // Stable, so the relative order inside each partition survives
        match self.options.first {
            Some(First::Folders) => items.sort_by_key(|c| !c.is_folder),
            Some(First::Files) => items.sort_by_key(|c| c.is_folder),
            None => {}
        }
    }
}

fn apply_limit<N>(mut items: Vec<Candidate<N>>, limit: Option<ItemLimit>) -> Selection<N> {
    match limit {
        None => Selection {
            shown: items,
            hidden: Vec::new(),
        },
        Some(ItemLimit::Total(n)) => {
            let hidden = items.split_off(n.min(items.len()));
            Selection {
                shown: items,
                hidden,
            }
        }
        Some(ItemLimit::Split { folders, files }) => {
            let (mut folder_count, mut file_count) = (0, 0);
            let (shown, hidden): (Vec<_>, Vec<_>) = items.into_iter().partition(|c| {
                let (count, cap) = if c.is_folder {
                    (&mut folder_count, folders)
                } else {
                    (&mut file_count, files)
                };
                *count += 1;
                *count <= cap
            });
            Selection { shown, hidden }
        }
    }
}
