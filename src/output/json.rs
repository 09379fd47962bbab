//! JSON output formatting

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::style::StyleTokens;
use crate::tree::MockNode;

fn print_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| Error::Io {
        path: PathBuf::from("<stdout>"),
        source: e.into(),
    })?;
    println!("{}", json);
    Ok(())
}

/// Print a mock tree as pretty-printed JSON to stdout.
pub fn print_json(node: &MockNode) -> Result<()> {
    print_pretty(node)
}

/// Print resolved style tokens as a JSON mapping to stdout.
pub fn print_style_json(tokens: &StyleTokens) -> Result<()> {
    print_pretty(tokens)
}
