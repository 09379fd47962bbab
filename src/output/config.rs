//! Render configuration types

use std::cmp::Ordering;
use std::fmt;
use std::io;
use std::rc::Rc;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::style::{StyleOptions, StyleTokens, TokenOverrides};
use crate::tree::ItemRef;

/// Marker shown in place of a folder's contents when listing it failed with
/// an acceptable error.
pub const DEFAULT_DENIED_STRING: &str = "[ACCESS DENIED]";

/// Cap on the number of items shown per folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemLimit {
    /// At most this many items in total.
    Total(usize),
    /// Separate caps for folders and files.
    Split { folders: usize, files: usize },
}

impl FromStr for ItemLimit {
    type Err = Error;

    /// Parses `"N"` or `"FOLDERS,FILES"`.
    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| Error::config(format!("invalid item limit '{}'", s)))
        };
        match s.split_once(',') {
            Some((folders, files)) => Ok(ItemLimit::Split {
                folders: parse(folders)?,
                files: parse(files)?,
            }),
            None => Ok(ItemLimit::Total(parse(s)?)),
        }
    }
}

/// How content hidden by a depth or item limit is represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Beyond {
    /// A literal `...` line.
    Ellipsis,
    /// `"<F> folder(s), <G> file(s)"` for the hidden direct children.
    Content,
    /// Arbitrary text (spelled `_text` on the command line).
    Custom(String),
}

impl Beyond {
    pub fn text(&self, folders: usize, files: usize) -> String {
        match self {
            Beyond::Ellipsis => "...".to_string(),
            Beyond::Content => format!("{} folder(s), {} file(s)", folders, files),
            Beyond::Custom(text) => text.clone(),
        }
    }
}

impl FromStr for Beyond {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(custom) = s.strip_prefix('_') {
            return Ok(Beyond::Custom(custom.to_string()));
        }
        match s.to_lowercase().as_str() {
            "ellipsis" => Ok(Beyond::Ellipsis),
            "content" | "contents" => Ok(Beyond::Content),
            _ => Err(Error::config(format!(
                "beyond must be \"ellipsis\", \"content\", or a string starting with \"_\", not \"{}\"",
                s
            ))),
        }
    }
}

/// Which kind of item is listed first within a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum First {
    Files,
    Folders,
}

impl FromStr for First {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "files" => Ok(First::Files),
            "folders" => Ok(First::Folders),
            _ => Err(Error::config(format!(
                "first must be \"files\" or \"folders\", not \"{}\"",
                s
            ))),
        }
    }
}

/// How include/exclude patterns are matched against item names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatternMode {
    /// Exact name equality.
    #[default]
    Literal,
    /// Regular expression that must match the whole name.
    Regex,
    /// Shell-style glob.
    Glob,
}

/// Comparison used when sorting the items of a folder by name.
#[derive(Clone)]
pub struct SortKey(Rc<dyn Fn(&str, &str) -> Ordering>);

impl SortKey {
    /// Sort by a key derived from each item name.
    pub fn by<K, F>(key: F) -> Self
    where
        K: Ord,
        F: Fn(&str) -> K + 'static,
    {
        SortKey(Rc::new(move |a: &str, b: &str| key(a).cmp(&key(b))))
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        (self.0)(a, b)
    }
}

impl fmt::Debug for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SortKey(..)")
    }
}

/// Predicate deciding whether an item is listed at all.
pub type Mask = Rc<dyn Fn(&ItemRef<'_>) -> bool>;

/// Per-item callback returning option overrides.
pub type FormatterFn = Rc<dyn Fn(&ItemRef<'_>) -> Option<OptionPatch>>;

/// Wrap a closure as a [`Mask`].
pub fn mask<F>(f: F) -> Mask
where
    F: Fn(&ItemRef<'_>) -> bool + 'static,
{
    Rc::new(f)
}

/// Wrap a closure as a [`FormatterFn`].
pub fn formatter<F>(f: F) -> FormatterFn
where
    F: Fn(&ItemRef<'_>) -> Option<OptionPatch> + 'static,
{
    Rc::new(f)
}

/// Configuration for rendering a tree.
#[derive(Clone)]
pub struct RenderOptions {
    pub tokens: StyleTokens,
    /// Folders at this depth are shown without their contents.
    pub depth_limit: Option<usize>,
    pub item_limit: Option<ItemLimit>,
    pub beyond: Option<Beyond>,
    pub first: Option<First>,
    pub sort: bool,
    pub sort_reverse: bool,
    /// Defaults to a case-sensitive name comparison.
    pub sort_key: Option<SortKey>,
    pub include_folders: Vec<String>,
    pub exclude_folders: Vec<String>,
    pub include_files: Vec<String>,
    pub exclude_files: Vec<String>,
    pub pattern_mode: PatternMode,
    pub mask: Option<Mask>,
    pub formatter: Option<FormatterFn>,
    /// Let formatter overrides carry over into the descendants of an item.
    pub sticky_formatter: bool,
    /// Listing errors of these kinds are rendered as `denied_string`.
    pub acceptable_errors: Vec<io::ErrorKind>,
    pub denied_string: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tokens: StyleTokens::default(),
            depth_limit: None,
            item_limit: None,
            beyond: None,
            first: None,
            sort: false,
            sort_reverse: false,
            sort_key: None,
            include_folders: Vec::new(),
            exclude_folders: Vec::new(),
            include_files: Vec::new(),
            exclude_files: Vec::new(),
            pattern_mode: PatternMode::Literal,
            mask: None,
            formatter: None,
            sticky_formatter: false,
            acceptable_errors: Vec::new(),
            denied_string: DEFAULT_DENIED_STRING.to_string(),
        }
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("tokens", &self.tokens)
            .field("depth_limit", &self.depth_limit)
            .field("item_limit", &self.item_limit)
            .field("beyond", &self.beyond)
            .field("first", &self.first)
            .field("sort", &self.sort)
            .field("sort_reverse", &self.sort_reverse)
            .field("include_folders", &self.include_folders)
            .field("exclude_folders", &self.exclude_folders)
            .field("include_files", &self.include_files)
            .field("exclude_files", &self.exclude_files)
            .field("pattern_mode", &self.pattern_mode)
            .field("mask", &self.mask.is_some())
            .field("formatter", &self.formatter.is_some())
            .field("sticky_formatter", &self.sticky_formatter)
            .field("acceptable_errors", &self.acceptable_errors)
            .field("denied_string", &self.denied_string)
            .finish_non_exhaustive()
    }
}

impl RenderOptions {
    /// Default options drawn with the given style.
    pub fn with_style(style: &StyleOptions) -> Result<Self> {
        Ok(Self {
            tokens: style.resolve()?,
            ..Default::default()
        })
    }

    /// Whether a listing failure should be rendered instead of propagated.
    pub fn accepts(&self, err: &Error) -> bool {
        err.listing_kind()
            .is_some_and(|kind| self.acceptable_errors.contains(&kind))
    }

    /// Whether a folder at `depth` has reached the depth limit.
    pub fn at_depth_limit(&self, depth: usize) -> bool {
        self.depth_limit.is_some_and(|limit| depth >= limit)
    }
}

/// Overrides returned by a formatter callback. Unset fields keep the value
/// of the options they are applied to.
#[derive(Clone, Default)]
pub struct OptionPatch {
    depth_limit: Option<Option<usize>>,
    item_limit: Option<Option<ItemLimit>>,
    beyond: Option<Option<Beyond>>,
    first: Option<Option<First>>,
    sort: Option<bool>,
    sort_reverse: Option<bool>,
    sort_key: Option<Option<SortKey>>,
    include_folders: Option<Vec<String>>,
    exclude_folders: Option<Vec<String>>,
    include_files: Option<Vec<String>>,
    exclude_files: Option<Vec<String>>,
    pattern_mode: Option<PatternMode>,
    mask: Option<Option<Mask>>,
    tokens: TokenOverrides,
}

impl OptionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth_limit(mut self, limit: Option<usize>) -> Self {
        self.depth_limit = Some(limit);
        self
    }

    pub fn item_limit(mut self, limit: Option<ItemLimit>) -> Self {
        self.item_limit = Some(limit);
        self
    }

    pub fn beyond(mut self, beyond: Option<Beyond>) -> Self {
        self.beyond = Some(beyond);
        self
    }

    pub fn first(mut self, first: Option<First>) -> Self {
        self.first = Some(first);
        self
    }

    pub fn sort(mut self, sort: bool) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn sort_reverse(mut self, reverse: bool) -> Self {
        self.sort_reverse = Some(reverse);
        self
    }

    pub fn sort_key(mut self, key: Option<SortKey>) -> Self {
        self.sort_key = Some(key);
        self
    }

    pub fn include_folders(mut self, patterns: Vec<String>) -> Self {
        self.include_folders = Some(patterns);
        self
    }

    pub fn exclude_folders(mut self, patterns: Vec<String>) -> Self {
        self.exclude_folders = Some(patterns);
        self
    }

    pub fn include_files(mut self, patterns: Vec<String>) -> Self {
        self.include_files = Some(patterns);
        self
    }

    pub fn exclude_files(mut self, patterns: Vec<String>) -> Self {
        self.exclude_files = Some(patterns);
        self
    }

    pub fn pattern_mode(mut self, mode: PatternMode) -> Self {
        self.pattern_mode = Some(mode);
        self
    }

    pub fn mask(mut self, mask: Option<Mask>) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn tokens(mut self, tokens: TokenOverrides) -> Self {
        self.tokens = tokens;
        self
    }

    /// Merge the set fields onto `options`.
    pub fn apply_to(&self, options: &mut RenderOptions) {
        if let Some(limit) = self.depth_limit {
            options.depth_limit = limit;
        }
        if let Some(limit) = self.item_limit {
            options.item_limit = limit;
        }
        if let Some(ref beyond) = self.beyond {
            options.beyond = beyond.clone();
        }
        if let Some(first) = self.first {
            options.first = first;
        }
        if let Some(sort) = self.sort {
            options.sort = sort;
        }
        if let Some(reverse) = self.sort_reverse {
            options.sort_reverse = reverse;
        }
        if let Some(ref key) = self.sort_key {
            options.sort_key = key.clone();
        }
        if let Some(ref patterns) = self.include_folders {
            options.include_folders = patterns.clone();
        }
        if let Some(ref patterns) = self.exclude_folders {
            options.exclude_folders = patterns.clone();
        }
        if let Some(ref patterns) = self.include_files {
            options.include_files = patterns.clone();
        }
        if let Some(ref patterns) = self.exclude_files {
            options.exclude_files = patterns.clone();
        }
        if let Some(mode) = self.pattern_mode {
            options.pattern_mode = mode;
        }
        if let Some(ref mask) = self.mask {
            options.mask = mask.clone();
        }
        self.tokens.apply_to(&mut options.tokens);
    }
}

impl fmt::Debug for OptionPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionPatch")
            .field("depth_limit", &self.depth_limit)
            .field("item_limit", &self.item_limit)
            .field("beyond", &self.beyond)
            .field("first", &self.first)
            .field("sort", &self.sort)
            .field("sort_reverse", &self.sort_reverse)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
