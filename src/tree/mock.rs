//! In-memory folder trees
//!
//! A [`MockNode`] is a shared handle onto a file or folder. Folders own their
//! children in insertion order; every node keeps a weak link back to its
//! parent, so dropping the last handle on a root drops the whole tree.

use std::cell::RefCell;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use log::{debug, info, warn};
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::output::{RenderOptions, TreeFormatter};

use super::node::TreeItem;
use super::system::SystemNode;
use super::traversal::BaseTraversal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Folder,
}

struct NodeData {
    name: String,
    kind: NodeKind,
    parent: Weak<RefCell<NodeData>>,
    children: Vec<MockNode>,
}

/// Handle onto a node of an in-memory tree.
///
/// Clones share the node; equality is identity.
#[derive(Clone)]
pub struct MockNode(Rc<RefCell<NodeData>>);

impl MockNode {
    fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        MockNode(Rc::new(RefCell::new(NodeData {
            name: name.into(),
            kind,
            parent: Weak::new(),
            children: Vec::new(),
        })))
    }

    /// A detached, empty folder.
    pub fn folder(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Folder)
    }

    /// A detached file.
    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::File)
    }

    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    /// Rename the node. Fails if a sibling already uses `name`.
    pub fn rename(&self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if let Some(parent) = self.parent() {
            let taken = parent.child(&name).is_some_and(|existing| existing != *self);
            if taken {
                return Err(Error::tree(format!(
                    "cannot rename {} to \"{}\": name already used in {}",
                    self.path(),
                    name,
                    parent.path()
                )));
            }
        }
        self.0.borrow_mut().name = name;
        Ok(())
    }

    pub fn kind(&self) -> NodeKind {
        self.0.borrow().kind
    }

    pub fn is_folder(&self) -> bool {
        self.kind() == NodeKind::Folder
    }

    pub fn is_file(&self) -> bool {
        self.kind() == NodeKind::File
    }

    pub fn parent(&self) -> Option<MockNode> {
        self.0.borrow().parent.upgrade().map(MockNode)
    }

    /// The topmost ancestor, or the node itself when it has no parent.
    pub fn root(&self) -> MockNode {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Number of ancestors.
    pub fn depth(&self) -> usize {
        self.parent().map_or(0, |parent| parent.depth() + 1)
    }

    /// Names from the root down to this node, joined with `/`.
    pub fn path(&self) -> String {
        match self.parent() {
            Some(parent) => format!("{}/{}", parent.path(), self.name()),
            None => self.name(),
        }
    }

    pub fn children(&self) -> Vec<MockNode> {
        self.0.borrow().children.clone()
    }

    pub fn child_names(&self) -> Vec<String> {
        self.0.borrow().children.iter().map(|c| c.name()).collect()
    }

    pub fn child(&self, name: &str) -> Option<MockNode> {
        self.0
            .borrow()
            .children
            .iter()
            .find(|c| c.0.borrow().name == name)
            .cloned()
    }

    /// Every other child of this node's parent.
    pub fn siblings(&self) -> Vec<MockNode> {
        match self.parent() {
            Some(parent) => parent
                .children()
                .into_iter()
                .filter(|c| c != self)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Look up a descendant by a `/`-separated relative path.
    pub fn get(&self, path: &str) -> Result<MockNode> {
        let mut current = self.clone();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = current.child(segment).ok_or_else(|| Error::Lookup {
                path: path.to_string(),
                root: self.path(),
            })?;
        }
        Ok(current)
    }

    fn adopt(&self, child: MockNode) -> Result<MockNode> {
        child.set_parent(Some(self))?;
        Ok(child)
    }

    pub fn create_folder(&self, name: impl Into<String>) -> Result<MockNode> {
        self.adopt(MockNode::folder(name))
    }

    pub fn create_file(&self, name: impl Into<String>) -> Result<MockNode> {
        self.adopt(MockNode::file(name))
    }

    pub fn create_folders<I, S>(&self, names: I) -> Result<Vec<MockNode>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(|n| self.create_folder(n)).collect()
    }

    pub fn create_files<I, S>(&self, names: I) -> Result<Vec<MockNode>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(|n| self.create_file(n)).collect()
    }

    /// Move the node under `parent`, or detach it with `None`.
    ///
    /// Rejects files as parents, moves that would make the node its own
    /// ancestor and name collisions in the new parent. Moving a node to the
    /// parent it already has is a no-op.
    pub fn set_parent(&self, parent: Option<&MockNode>) -> Result<()> {
        let Some(parent) = parent else {
            self.detach();
            return Ok(());
        };

        if !parent.is_folder() {
            return Err(Error::tree(format!(
                "cannot add \"{}\" to {}: not a folder",
                self.name(),
                parent.path()
            )));
        }
        if self.parent().as_ref() == Some(parent) {
            return Ok(());
        }

        let mut ancestor = Some(parent.clone());
        while let Some(node) = ancestor {
            if node == *self {
                return Err(Error::tree(format!(
                    "cannot move {} into {}: a node cannot be its own ancestor",
                    self.path(),
                    parent.path()
                )));
            }
            ancestor = node.parent();
        }

        let name = self.name();
        if parent.child(&name).is_some() {
            return Err(Error::tree(format!(
                "\"{}\" already exists in {}",
                name,
                parent.path()
            )));
        }

        self.detach();
        parent.0.borrow_mut().children.push(self.clone());
        self.0.borrow_mut().parent = Rc::downgrade(&parent.0);
        Ok(())
    }

    /// Remove the node from its parent, making it a root.
    pub fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent.0.borrow_mut().children.retain(|c| c != self);
        }
        self.0.borrow_mut().parent = Weak::new();
    }

    /// Detach the child called `name` and hand it back.
    pub fn delete(&self, name: &str) -> Result<MockNode> {
        let child = self.child(name).ok_or_else(|| {
            Error::tree(format!("no item named \"{}\" in {}", name, self.path()))
        })?;
        child.detach();
        Ok(child)
    }

    /// Detach `child`, which must be a direct child of this node.
    pub fn delete_node(&self, child: &MockNode) -> Result<()> {
        if child.parent().as_ref() != Some(self) {
            return Err(Error::tree(format!(
                "{} is not a child of {}",
                child.path(),
                self.path()
            )));
        }
        child.detach();
        Ok(())
    }

    /// Detach every child.
    pub fn clear(&self) {
        for child in self.children() {
            child.detach();
        }
    }

    /// Deep copy of the subtree, as a new root.
    pub fn copy(&self) -> MockNode {
        let copy = MockNode::new(self.name(), self.kind());
        for child in self.children() {
            let child_copy = child.copy();
            child_copy.0.borrow_mut().parent = Rc::downgrade(&copy.0);
            copy.0.borrow_mut().children.push(child_copy);
        }
        copy
    }

    /// Call `f` on this node and every descendant, parents before children.
    pub fn walk_apply<F: FnMut(&MockNode)>(&self, mut f: F) {
        fn walk(node: &MockNode, f: &mut dyn FnMut(&MockNode)) {
            f(node);
            for child in node.children() {
                walk(&child, f);
            }
        }
        walk(self, &mut f);
    }

    /// Drop every descendant more than `depth_limit` levels below this node.
    pub fn trim(&self, depth_limit: usize) {
        if depth_limit == 0 {
            self.clear();
            return;
        }
        for child in self.children() {
            child.trim(depth_limit - 1);
        }
    }

    /// Render the tree with `options`.
    pub fn render(&self, options: &RenderOptions) -> Result<String> {
        TreeFormatter::new(options.clone()).format(self)
    }

    /// Copy any tree source into a new mock tree.
    ///
    /// The copy goes through the same mask, pattern, sort and limit policies
    /// as rendering does, so rendering it with `options` gives the same
    /// diagram as rendering `source`. Tokens and formatter callbacks only
    /// affect rendering and are ignored here.
    ///
    /// With a beyond policy set, the limits are relaxed so that the hidden
    /// content is still there to be counted: items cut by the item limit are
    /// kept, and so is one level past the depth limit.
    ///
    /// A folder whose listing fails with an accepted error is copied empty.
    /// It has no denied marker, so such a snapshot renders differently from
    /// its source.
    pub fn snapshot<N: TreeItem>(source: &N, options: &RenderOptions) -> Result<MockNode> {
        if !source.is_folder() {
            return Ok(MockNode::file(source.name()));
        }
        let options = &snapshot_options(options);
        let traversal = BaseTraversal::new(options)?;
        let root = MockNode::folder(source.name());
        copy_children(&traversal, options, source, &root, 0)?;
        Ok(root)
    }

    /// Snapshot a real directory.
    pub fn from_dir(path: impl AsRef<Path>, options: &RenderOptions) -> Result<MockNode> {
        MockNode::snapshot(&SystemNode::open(path)?, options)
    }

    /// Create this tree on disk under `dest`: folders become directories and
    /// files become empty files. Existing entries are never overwritten.
    pub fn realize(&self, dest: impl AsRef<Path>) -> Result<()> {
        let dest = dest.as_ref();
        info!("creating {} under {}", self.path(), dest.display());
        self.realize_into(dest)
    }

    fn realize_into(&self, dest: &Path) -> Result<()> {
        let target = dest.join(self.name());
        let io_err = |source: io::Error| Error::Io {
            path: target.clone(),
            source,
        };
        match self.kind() {
            NodeKind::Folder => {
                fs::create_dir(&target).map_err(io_err)?;
                for child in self.children() {
                    child.realize_into(&target)?;
                }
            }
            NodeKind::File => {
                OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .open(&target)
                    .map_err(io_err)?;
            }
        }
        debug!("created {}", target.display());
        Ok(())
    }

    fn view(&self) -> NodeView {
        let name = self.name();
        match self.kind() {
            NodeKind::File => NodeView::File { name },
            NodeKind::Folder => NodeView::Folder {
                name,
                children: self.children().iter().map(MockNode::view).collect(),
            },
        }
    }
}

/// Copy policies for a snapshot that is later rendered with `options`.
fn snapshot_options(options: &RenderOptions) -> RenderOptions {
    let mut copy = options.clone();
    if copy.beyond.is_some() {
        copy.item_limit = None;
        copy.depth_limit = copy.depth_limit.map(|limit| limit + 1);
    }
    copy
}

fn copy_children<N: TreeItem>(
    traversal: &BaseTraversal<'_>,
    options: &RenderOptions,
    source: &N,
    target: &MockNode,
    depth: usize,
) -> Result<()> {
    if options.at_depth_limit(depth) {
        return Ok(());
    }
    let children = match source.children() {
        Ok(children) => children,
        Err(e) if options.accepts(&e) => {
            warn!("copying {} as empty: {}", target.path(), e);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    for candidate in traversal.select(children, depth + 1, false).shown {
        if candidate.is_folder {
            let folder = target.create_folder(candidate.name)?;
            copy_children(traversal, options, &candidate.node, &folder, depth + 1)?;
        } else {
            target.create_file(candidate.name)?;
        }
    }
    Ok(())
}

impl PartialEq for MockNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for MockNode {}

impl fmt::Debug for MockNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            NodeKind::Folder => write!(f, "MockFolder({})", self.path()),
            NodeKind::File => write!(f, "MockFile({})", self.path()),
        }
    }
}

impl fmt::Display for MockNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .render(&RenderOptions::default())
            .map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl TreeItem for MockNode {
    fn name(&self) -> String {
        MockNode::name(self)
    }

    fn path(&self) -> PathBuf {
        PathBuf::from(MockNode::path(self))
    }

    fn is_folder(&self) -> bool {
        MockNode::is_folder(self)
    }

    fn children(&self) -> Result<Vec<Self>> {
        match self.kind() {
            NodeKind::Folder => Ok(MockNode::children(self)),
            NodeKind::File => Err(Error::Listing {
                path: TreeItem::path(self),
                source: io::Error::from(io::ErrorKind::NotADirectory),
            }),
        }
    }
}

/// Serialized shape of a mock tree.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum NodeView {
    File {
        name: String,
    },
    Folder {
        name: String,
        children: Vec<NodeView>,
    },
}

impl Serialize for MockNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.view().serialize(serializer)
    }
}
