//! Tree formatter
//!
//! `TreeFormatter` walks any `TreeItem` depth-first and turns it into lines.
//! Every folder's listing goes through the shared child selection, then each
//! surviving child gets a header built from the style tokens:
//!
//! ```text
//! r/
//! ├─a/          split
//! │ ├─c.txt     extend, split
//! │ └─...       extend, final (beyond line)
//! └─b.txt       final
//! ```

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::warn;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::error::{Error, Result};
use crate::style::StyleTokens;
use crate::tree::traversal::BaseTraversal;
use crate::tree::{ItemRef, SystemNode, TreeItem};

use super::config::RenderOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Folder,
    File,
    /// Stand-in for content hidden by a limit.
    Beyond,
    /// Stand-in for a folder whose listing failed with an accepted error.
    Denied,
}

/// One line of a diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// Connector tokens in front of the text.
    pub header: String,
    pub text: String,
    pub kind: LineKind,
}

impl RenderedLine {
    fn item(header: String, tokens: &StyleTokens, name: &str, is_folder: bool) -> Self {
        let (start, end, kind) = if is_folder {
            (&tokens.folderstart, &tokens.folderend, LineKind::Folder)
        } else {
            (&tokens.filestart, &tokens.fileend, LineKind::File)
        };
        Self {
            header,
            text: format!("{}{}{}", start, name, end),
            kind,
        }
    }
}

/// Build the connector prefix of a line. `open` holds, per ancestor level
/// below the root, whether that ancestor still has siblings to come.
fn header(tokens: &StyleTokens, open: &[bool], is_last: bool) -> String {
    let mut header = String::new();
    for &more in open {
        header.push_str(if more { &tokens.extend } else { &tokens.space });
    }
    header.push_str(if is_last { &tokens.final_ } else { &tokens.split });
    header
}

/// State of one render pass.
struct Walk<'w> {
    /// Child selection for the formatter's own options.
    shared: &'w BaseTraversal<'w>,
    /// Per ancestor level below the root, whether more siblings follow.
    open: Vec<bool>,
    lines: &'w mut Vec<RenderedLine>,
}

/// Formatter for folder diagrams.
pub struct TreeFormatter {
    options: RenderOptions,
}

impl TreeFormatter {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render `root` into lines, root first.
    pub fn lines<N: TreeItem>(&self, root: &N) -> Result<Vec<RenderedLine>> {
        let name = root.name();
        let path = root.path();
        let is_folder = root.is_folder();
        let active = self.patched(&self.options, &item_ref(&name, &path, is_folder, 0));

        let mut lines = vec![RenderedLine::item(
            String::new(),
            &active.tokens,
            &name,
            is_folder,
        )];
        if is_folder {
            let base = if self.options.sticky_formatter {
                active.as_ref()
            } else {
                &self.options
            };
            let shared = BaseTraversal::new(&self.options)?;
            let mut walk = Walk {
                shared: &shared,
                open: Vec::new(),
                lines: &mut lines,
            };
            self.visit_folder(root, 0, base, &active, &mut walk)?;
        }
        Ok(lines)
    }

    /// Render `root` into a single string, one line per item and no trailing
    /// newline.
    pub fn format<N: TreeItem>(&self, root: &N) -> Result<String> {
        let lines = self.lines(root)?;
        let text: Vec<String> = lines
            .into_iter()
            .map(|line| line.header + &line.text)
            .collect();
        Ok(text.join("\n"))
    }

    /// Print `root` to stdout. Nothing is printed if rendering fails.
    pub fn print<N: TreeItem>(&self, root: &N, use_color: bool) -> Result<()> {
        let lines = self.lines(root)?;
        let choice = if use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        write_lines(&mut stdout, &lines).map_err(|source| Error::Io {
            path: PathBuf::from("<stdout>"),
            source,
        })
    }

    /// Options for `item`, starting from `base`, after the formatter callback.
    fn patched<'o>(&self, base: &'o RenderOptions, item: &ItemRef<'_>) -> Cow<'o, RenderOptions> {
        match base.formatter.as_ref().and_then(|formatter| formatter(item)) {
            Some(patch) => {
                let mut options = base.clone();
                patch.apply_to(&mut options);
                Cow::Owned(options)
            }
            None => Cow::Borrowed(base),
        }
    }

    /// Emit the lines below `folder`, which sits at `depth`.
    ///
    /// `active` holds the folder's own (possibly patched) options and governs
    /// its listing; `base` is what each child's options start from.
    fn visit_folder<N: TreeItem>(
        &self,
        folder: &N,
        depth: usize,
        base: &RenderOptions,
        active: &RenderOptions,
        walk: &mut Walk<'_>,
    ) -> Result<()> {
        let cutoff = active.at_depth_limit(depth);
        if cutoff && active.beyond.is_none() {
            return Ok(());
        }

        let children = match folder.children() {
            Ok(children) => children,
            Err(e) if active.accepts(&e) => {
                warn!("{}", e);
                walk.lines.push(RenderedLine {
                    header: header(&active.tokens, &walk.open, true),
                    text: active.denied_string.clone(),
                    kind: LineKind::Denied,
                });
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        // Patched options need their own patterns compiled
        let rebuilt;
        let traversal = if walk.shared.governs(active) {
            walk.shared
        } else {
            rebuilt = BaseTraversal::new(active)?;
            &rebuilt
        };
        let selection = traversal.select(children, depth + 1, cutoff);
        let beyond = active
            .beyond
            .as_ref()
            .filter(|_| cutoff || !selection.hidden.is_empty());

        let count = selection.shown.len();
        for (i, child) in selection.shown.iter().enumerate() {
            let is_last = i + 1 == count && beyond.is_none();
            let child_active = self.patched(base, &child.item(depth + 1));
            let tokens = &child_active.tokens;
            walk.lines.push(RenderedLine::item(
                header(tokens, &walk.open, is_last),
                tokens,
                &child.name,
                child.is_folder,
            ));

            if child.is_folder {
                let next_base = if self.options.sticky_formatter {
                    child_active.as_ref()
                } else {
                    base
                };
                walk.open.push(!is_last);
                let visited = self.visit_folder(&child.node, depth + 1, next_base, &child_active, walk);
                walk.open.pop();
                visited?;
            }
        }

        if let Some(beyond) = beyond {
            let (folders, files) = selection.hidden_counts();
            walk.lines.push(RenderedLine {
                header: header(&active.tokens, &walk.open, true),
                text: beyond.text(folders, files),
                kind: LineKind::Beyond,
            });
        }
        Ok(())
    }
}

fn item_ref<'a>(name: &'a str, path: &'a Path, is_folder: bool, depth: usize) -> ItemRef<'a> {
    ItemRef {
        name,
        path,
        is_folder,
        depth,
    }
}

fn write_lines(stdout: &mut StandardStream, lines: &[RenderedLine]) -> io::Result<()> {
    for line in lines {
        write!(stdout, "{}", line.header)?;
        match line.kind {
            LineKind::Folder => {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
            }
            LineKind::Beyond | LineKind::Denied => {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            }
            LineKind::File => {}
        }
        write!(stdout, "{}", line.text)?;
        stdout.reset()?;
        writeln!(stdout)?;
    }
    Ok(())
}

/// Render the directory at `path`.
pub fn render_path(path: impl AsRef<Path>, options: &RenderOptions) -> Result<String> {
    let root = SystemNode::open(path)?;
    TreeFormatter::new(options.clone()).format(&root)
}
