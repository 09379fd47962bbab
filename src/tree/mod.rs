//! Tree sources
//!
//! Two kinds of node can be rendered:
//!
//! - `SystemNode`: a path on disk
//! - `MockNode`: an in-memory tree, built by hand, snapshotted from another
//!   source, parsed from a text diagram or generated at random
//!
//! Both implement `TreeItem`, and both go through the same child selection
//! (`traversal`) when rendered or snapshotted.

mod mock;
mod node;
mod parse;
mod random;
mod system;
pub(crate) mod traversal;
mod utils;

pub use mock::{MockNode, NodeKind};
pub use node::{ItemRef, TreeItem};
pub use parse::{ParseOptions, parse_tree};
pub use random::{DEFAULT_WORDS, RandomTreeConfig, populate, random_tree};
pub use system::{SystemNode, resolve_path};
