//! Sprig - folder tree diagrams for real and mock directories

pub mod error;
pub mod output;
pub mod style;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{Error, Result};
pub use output::{
    Beyond, First, ItemLimit, OptionPatch, PatternMode, RenderOptions, SortKey, TreeFormatter,
    print_json, print_style_json, render_path,
};
pub use style::{StyleOptions, StyleTokens, TokenOverrides, format_indent, get_style};
pub use tree::{
    ItemRef, MockNode, ParseOptions, RandomTreeConfig, SystemNode, TreeItem, parse_tree,
    random_tree,
};
