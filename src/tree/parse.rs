//! Reading indented text diagrams back into mock trees
//!
//! Each line is split into a header (the drawing characters in front of the
//! name) and a name. The header width is the line's depth, and a line's
//! parent is the closest earlier line with the largest smaller depth. This
//! accepts the output of every builtin style as well as most hand-drawn
//! listings:
//!
//! ```text
//! doc/
//! ├─_static/
//! │ └─less_deep_file
//! └─index.rst   # comments are dropped
//! ```

use std::collections::HashMap;

use regex::Regex;

use crate::error::{Error, Result};

use super::mock::MockNode;

const FORBIDDEN: &str = "/:?\"*<>|";
const NOT_A_START: &str = "+=-";
const SLASHES: [char; 2] = ['/', '\\'];

/// Options for [`parse_tree`].
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Characters that may begin a name. Defaults to ASCII letters, digits
    /// and punctuation other than `/:?"*<>|+=-`, plus non-ASCII letters.
    pub start_chars: Option<String>,
    /// Characters that may appear in a name. Defaults to the start
    /// characters plus `+=-` and space.
    pub name_chars: Option<String>,
    /// Regex for the header; replaces `start_chars` when set.
    pub header_regex: Option<String>,
    /// Regex for the name, matched right after the header; replaces
    /// `name_chars` when set.
    pub name_regex: Option<String>,
    /// Name of the folder created when the text has no single top item.
    pub supername: String,
    /// Strip `#` comments from names.
    pub parse_comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            start_chars: None,
            name_chars: None,
            header_regex: None,
            name_regex: None,
            supername: "FakeDir".to_string(),
            parse_comments: true,
        }
    }
}

enum CharClass {
    Start,
    Name,
    Custom(String),
}

impl CharClass {
    fn contains(&self, c: char) -> bool {
        match self {
            CharClass::Start => is_name_char(c) && !NOT_A_START.contains(c) && c != ' ',
            CharClass::Name => is_name_char(c),
            CharClass::Custom(chars) => chars.contains(c),
        }
    }
}

fn is_name_char(c: char) -> bool {
    if c.is_ascii() {
        (c.is_ascii_graphic() && !FORBIDDEN.contains(c)) || c == ' '
    } else {
        c.is_alphanumeric()
    }
}

fn anchored(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})", pattern))
        .map_err(|e| Error::parse(0, format!("invalid regex '{}': {}", pattern, e)))
}

/// Splits lines into headers and names.
struct LineReader {
    start: CharClass,
    name: CharClass,
    header_regex: Option<Regex>,
    name_regex: Option<Regex>,
    parse_comments: bool,
}

impl LineReader {
    fn new(options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            start: options
                .start_chars
                .clone()
                .map_or(CharClass::Start, CharClass::Custom),
            name: options
                .name_chars
                .clone()
                .map_or(CharClass::Name, CharClass::Custom),
            header_regex: options.header_regex.as_deref().map(anchored).transpose()?,
            name_regex: options.name_regex.as_deref().map(anchored).transpose()?,
            parse_comments: options.parse_comments,
        })
    }

    /// Depth and raw name (slashes included) of a line, if it has a name.
    fn read<'l>(&self, line: &'l str) -> Option<(usize, &'l str)> {
        let header_len = match self.header_regex {
            Some(ref regex) => regex.find(line)?.end(),
            None => line.find(|c| self.start.contains(c))?,
        };
        let (header, rest) = line.split_at(header_len);

        let raw = match self.name_regex {
            Some(ref regex) => regex.find(rest)?.as_str(),
            None => {
                let name_end = rest
                    .find(|c| !self.name.contains(c))
                    .unwrap_or(rest.len());
                let slash_end = rest[name_end..]
                    .find(|c| !SLASHES.contains(&c))
                    .map_or(rest.len(), |i| name_end + i);
                &rest[..slash_end]
            }
        };

        let name = match raw.find('#') {
            Some(hash) if self.parse_comments => &raw[..hash],
            _ => raw,
        }
        .trim();
        if name.trim_end_matches(SLASHES).is_empty() {
            return None;
        }
        Some((header.chars().count(), name))
    }
}

struct Entry<'t> {
    line: usize,
    depth: usize,
    name: &'t str,
}

/// Parse an indented tree diagram into a mock tree.
///
/// A line is a folder when its name ends in a slash or when the next line is
/// deeper. If several lines share the smallest depth, or deeper lines come
/// before the first of them, everything is placed under a new folder named
/// `options.supername`.
pub fn parse_tree(text: &str, options: &ParseOptions) -> Result<MockNode> {
    let reader = LineReader::new(options)?;
    let entries: Vec<Entry<'_>> = text
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            reader
                .read(line)
                .map(|(depth, name)| Entry { line: i + 1, depth, name })
        })
        .collect();

    let Some(min_depth) = entries.iter().map(|e| e.depth).min() else {
        return Err(Error::parse(1, "no folder or file names found"));
    };
    let first_top = entries
        .iter()
        .position(|e| e.depth == min_depth)
        .unwrap_or_default();
    let needs_super = entries.iter().filter(|e| e.depth == min_depth).count() > 1
        || entries[..first_top].iter().any(|e| e.depth > min_depth);
    let superparent = needs_super.then(|| MockNode::folder(options.supername.as_str()));

    let mut nodes: Vec<MockNode> = Vec::with_capacity(entries.len());
    // Depth of the first child seen under each parent line
    let mut child_depths: HashMap<usize, usize> = HashMap::new();
    // Indices of the lines that can still take children, shallowest first
    let mut open: Vec<usize> = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        let is_folder = entry.name.ends_with(SLASHES)
            || entries.get(i + 1).is_some_and(|next| next.depth > entry.depth);
        let name = entry.name.trim_end_matches(SLASHES);
        let node = if is_folder {
            MockNode::folder(name)
        } else {
            MockNode::file(name)
        };

        while open.last().is_some_and(|&top| entries[top].depth >= entry.depth) {
            open.pop();
        }
        let parent_index = open.last().copied();
        open.push(i);

        let parent = match parent_index {
            Some(p) => {
                let expected = *child_depths.entry(p).or_insert(entry.depth);
                if expected != entry.depth {
                    return Err(Error::parse(
                        entry.line,
                        format!(
                            "inconsistent indentation: \"{}\" is at depth {}, earlier items under \"{}\" are at depth {}",
                            name, entry.depth, entries[p].name, expected
                        ),
                    ));
                }
                Some(&nodes[p])
            }
            None => superparent.as_ref(),
        };
        if let Some(parent) = parent {
            node.set_parent(Some(parent))
                .map_err(|e| Error::parse(entry.line, e.to_string()))?;
        }
        nodes.push(node);
    }

    match superparent {
        Some(root) => Ok(root),
        None => Ok(nodes.swap_remove(first_top)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::RenderOptions;

    fn parse(text: &str) -> MockNode {
        parse_tree(text, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_parses_lines_style() {
        let root = parse(
            "doc/\n\
             ├─_static/\n\
             │ ├─embedded/\n\
             │ │ └─deep_file\n\
             │ └─less_deep_file\n\
             ├─about.rst\n\
             └─index.rst",
        );
        assert_eq!(root.name(), "doc");
        assert_eq!(root.child_names(), ["_static", "about.rst", "index.rst"]);
        assert!(root.get("_static/embedded/deep_file").unwrap().is_file());
        assert!(root.get("_static/embedded").unwrap().is_folder());
        assert_eq!(root.get("_static/less_deep_file").unwrap().depth(), 2);
    }

    #[test]
    fn test_folder_inferred_from_deeper_next_line() {
        let root = parse("top\n  inner\n    leaf\n  empty");
        assert!(root.get("inner").unwrap().is_folder());
        assert!(root.get("inner/leaf").unwrap().is_file());
        assert!(root.get("empty").unwrap().is_file());
    }

    #[test]
    fn test_trailing_slash_marks_empty_folder() {
        let root = parse("top/\n  empty/\n  file");
        assert!(root.get("empty").unwrap().is_folder());
    }

    #[test]
    fn test_comments_are_stripped() {
        let root = parse("app/\n  main.py   # entry point\n  # just a note\n  util.py");
        assert_eq!(root.child_names(), ["main.py", "util.py"]);
    }

    #[test]
    fn test_comments_kept_when_disabled() {
        let options = ParseOptions {
            parse_comments: false,
            ..Default::default()
        };
        let root = parse_tree("app/\n  c#.txt", &options).unwrap();
        assert_eq!(root.child_names(), ["c#.txt"]);
    }

    #[test]
    fn test_several_top_items_get_a_superparent() {
        let root = parse("a.txt\nb.txt\nsrc/\n  lib.rs");
        assert_eq!(root.name(), "FakeDir");
        assert_eq!(root.child_names(), ["a.txt", "b.txt", "src"]);
        assert_eq!(root.get("src/lib.rs").unwrap().depth(), 2);
    }

    #[test]
    fn test_deeper_lines_before_top_go_to_superparent() {
        let options = ParseOptions {
            supername: "Top".to_string(),
            ..Default::default()
        };
        let root = parse_tree("    stray.txt\nmain/\n  inner.txt", &options).unwrap();
        assert_eq!(root.name(), "Top");
        assert_eq!(root.child_names(), ["stray.txt", "main"]);
    }

    #[test]
    fn test_names_keep_spaces_and_dashes() {
        let root = parse("r/\n├─my file-1.txt\n└─x");
        assert_eq!(root.child_names(), ["my file-1.txt", "x"]);
    }

    #[test]
    fn test_no_names_is_parse_error() {
        let err = parse_tree("\n│ │\n", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_inconsistent_indentation_is_reported_with_line() {
        let err = parse_tree("r/\n    a\n  b", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));
    }

    #[test]
    fn test_deeper_jump_attaches_to_nearest_shallower_line() {
        let root = parse("root/\n  a/\n    a1.txt\n  b/\n      b1.txt");
        assert_eq!(root.child_names(), ["a", "b"]);
        assert_eq!(root.get("a").unwrap().child_names(), ["a1.txt"]);
        assert_eq!(root.get("b").unwrap().child_names(), ["b1.txt"]);

        let root = parse("r\n  a\n    b\n  c\n      d");
        assert!(root.get("a/b").unwrap().is_file());
        assert_eq!(root.get("c/d").unwrap().depth(), 2);
    }

    #[test]
    fn test_duplicate_siblings_are_reported_with_line() {
        let err = parse_tree("r/\n  a\n  a", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));
    }

    #[test]
    fn test_custom_header_regex() {
        let options = ParseOptions {
            header_regex: Some(r"[\. ]*".to_string()),
            ..Default::default()
        };
        let root = parse_tree("root/\n..a/\n....b.txt", &options).unwrap();
        assert!(root.get("a/b.txt").unwrap().is_file());
    }

    #[test]
    fn test_invalid_regex_is_parse_error() {
        let options = ParseOptions {
            name_regex: Some("(".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            parse_tree("r", &options),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_render_then_parse_keeps_every_path() {
        let root = MockNode::folder("proj");
        let src = root.create_folder("src").unwrap();
        src.create_files(["main.rs", "lib.rs"]).unwrap();
        src.create_folder("bin").unwrap().create_file("cli.rs").unwrap();
        root.create_files(["Cargo.toml", "README.md"]).unwrap();

        for style in ["lines", "dash", "plus", "spaces"] {
            let options =
                RenderOptions::with_style(&crate::style::StyleOptions::named(style)).unwrap();
            let text = root.render(&options).unwrap();
            let parsed = parse(&text);

            let mut expected = Vec::new();
            root.walk_apply(|n| expected.push((n.path(), n.depth(), n.is_folder())));
            let mut actual = Vec::new();
            parsed.walk_apply(|n| actual.push((n.path(), n.depth(), n.is_folder())));
            assert_eq!(actual, expected, "style {}", style);
        }
    }
}
