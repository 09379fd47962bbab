//! Name matching for include/exclude patterns

use glob::Pattern;
use regex::Regex;

use crate::error::{Error, Result};
use crate::output::{PatternMode, RenderOptions};

/// A compiled include or exclude pattern.
#[derive(Debug)]
enum Matcher {
    Literal(String),
    Regex(Regex),
    Glob(Pattern),
}

impl Matcher {
    fn compile(pattern: &str, mode: PatternMode) -> Result<Self> {
        match mode {
            PatternMode::Literal => Ok(Matcher::Literal(pattern.to_string())),
            PatternMode::Regex => Regex::new(&format!("^(?:{})$", pattern))
                .map(Matcher::Regex)
                .map_err(|e| Error::config(format!("invalid regex '{}': {}", pattern, e))),
            PatternMode::Glob => Pattern::new(pattern)
                .map(Matcher::Glob)
                .map_err(|e| Error::config(format!("invalid glob '{}': {}", pattern, e))),
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Matcher::Literal(literal) => literal == name,
            Matcher::Regex(regex) => regex.is_match(name),
            Matcher::Glob(pattern) => pattern.matches(name),
        }
    }
}

fn compile_all(patterns: &[String], mode: PatternMode) -> Result<Vec<Matcher>> {
    patterns.iter().map(|p| Matcher::compile(p, mode)).collect()
}

/// Include/exclude patterns for folders and files, compiled once per folder.
#[derive(Debug)]
pub(crate) struct NameFilter {
    include_folders: Vec<Matcher>,
    exclude_folders: Vec<Matcher>,
    include_files: Vec<Matcher>,
    exclude_files: Vec<Matcher>,
}

impl NameFilter {
    pub fn new(options: &RenderOptions) -> Result<Self> {
        let mode = options.pattern_mode;
        Ok(Self {
            include_folders: compile_all(&options.include_folders, mode)?,
            exclude_folders: compile_all(&options.exclude_folders, mode)?,
            include_files: compile_all(&options.include_files, mode)?,
            exclude_files: compile_all(&options.exclude_files, mode)?,
        })
    }

    /// Inclusion patterns of the item's kind, when present, decide alone;
    /// otherwise the item is kept unless an exclusion pattern matches.
    pub fn keeps(&self, name: &str, is_folder: bool) -> bool {
        let (include, exclude) = if is_folder {
            (&self.include_folders, &self.exclude_folders)
        } else {
            (&self.include_files, &self.exclude_files)
        };

        if !include.is_empty() {
            return include.iter().any(|m| m.matches(name));
        }
        !exclude.iter().any(|m| m.matches(name))
    }
}
