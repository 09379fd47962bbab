//! Diagram rendering and output
//!
//! # Module Structure
//!
//! - `config` - Render options and the formatter callback types
//! - `tree` - Formatter turning any tree source into lines
//! - `json` - JSON output

mod config;
mod json;
mod tree;

pub use config::{
    Beyond, DEFAULT_DENIED_STRING, First, FormatterFn, ItemLimit, Mask, OptionPatch, PatternMode,
    RenderOptions, SortKey, formatter, mask,
};
pub use json::{print_json, print_style_json};
pub use tree::{LineKind, RenderedLine, TreeFormatter, render_path};
