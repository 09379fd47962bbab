//! CLI entry point for sprig

use std::fs;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use log::debug;
use sprig::output::print_style_json;
use sprig::{
    Beyond, Error, First, ItemLimit, MockNode, ParseOptions, PatternMode, RandomTreeConfig,
    RenderOptions, SortKey, StyleOptions, SystemNode, TokenOverrides, TreeFormatter, parse_tree,
    print_json, random_tree,
};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            // Respect FORCE_COLOR environment variable
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            // Respect TERM=dumb
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

/// Which kind of item to list first
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FirstArg {
    Files,
    Folders,
}

/// Sort key for `--sort-by`
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortBy {
    /// Case-sensitive name
    Name,
    /// Name length
    Length,
    /// Extension, then name
    Extension,
}

/// How include/exclude patterns match names
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum MatchMode {
    #[default]
    Literal,
    Regex,
    Glob,
}

#[derive(Parser, Debug)]
#[command(name = "sprig")]
#[command(about = "Draw folder tree diagrams of real, parsed or random directories")]
#[command(version)]
struct Args {
    /// Directory to display
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Named style: lines, dash, spaces, plus, arrow, emoji
    #[arg(long = "style", default_value = "lines")]
    style: String,

    /// Width of the connector tokens
    #[arg(long = "indent", default_value = "2")]
    indent: usize,

    /// Use this string for every connector token
    #[arg(long = "uniform")]
    uniform: Option<String>,

    /// Use this string before every folder and file name
    #[arg(long = "anystart")]
    anystart: Option<String>,

    /// Use this string after every folder and file name
    #[arg(long = "anyend")]
    anyend: Option<String>,

    /// Connector for items with later siblings
    #[arg(long = "split", value_name = "TOKEN")]
    split: Option<String>,

    /// Connector continuing an ancestor with later siblings
    #[arg(long = "extend", value_name = "TOKEN")]
    extend: Option<String>,

    /// Connector under an ancestor without later siblings
    #[arg(long = "space", value_name = "TOKEN")]
    space: Option<String>,

    /// Connector for the last item of a folder
    #[arg(long = "final", value_name = "TOKEN")]
    final_token: Option<String>,

    #[arg(long = "folderstart", value_name = "TOKEN")]
    folderstart: Option<String>,

    #[arg(long = "filestart", value_name = "TOKEN")]
    filestart: Option<String>,

    #[arg(long = "folderend", value_name = "TOKEN")]
    folderend: Option<String>,

    #[arg(long = "fileend", value_name = "TOKEN")]
    fileend: Option<String>,

    /// Descend only N levels deep
    #[arg(short = 'L', long = "level")]
    level: Option<usize>,

    /// Show at most N items per folder, or F folders and G files with "F,G"
    #[arg(long = "items", value_name = "N|F,G")]
    items: Option<String>,

    /// Mark hidden content: ellipsis, content, or _TEXT for custom text
    #[arg(long = "beyond")]
    beyond: Option<String>,

    /// List files or folders first
    #[arg(long = "first")]
    first: Option<FirstArg>,

    /// Sort items by name
    #[arg(long = "sort")]
    sort: bool,

    /// Reverse the sort order
    #[arg(short = 'r', long = "reverse")]
    reverse: bool,

    /// Sort items by this key (implies --sort)
    #[arg(long = "sort-by")]
    sort_by: Option<SortBy>,

    /// Ignore files and folders matching pattern (can be used multiple times)
    #[arg(short = 'I', long = "ignore")]
    ignore: Vec<String>,

    /// Only show folders matching pattern (can be used multiple times)
    #[arg(long = "include-folders", value_name = "PATTERN")]
    include_folders: Vec<String>,

    /// Hide folders matching pattern (can be used multiple times)
    #[arg(long = "exclude-folders", value_name = "PATTERN")]
    exclude_folders: Vec<String>,

    /// Only show files matching pattern (can be used multiple times)
    #[arg(long = "include-files", value_name = "PATTERN")]
    include_files: Vec<String>,

    /// Hide files matching pattern (can be used multiple times)
    #[arg(long = "exclude-files", value_name = "PATTERN")]
    exclude_files: Vec<String>,

    /// How patterns are matched against names
    #[arg(long = "match", default_value = "literal")]
    match_mode: MatchMode,

    /// Show unreadable folders as a marker instead of failing
    #[arg(long = "ignore-denied")]
    ignore_denied: bool,

    /// Marker for unreadable folders (with --ignore-denied)
    #[arg(long = "denied-string", requires = "ignore_denied")]
    denied_string: Option<String>,

    /// Read the tree from a text diagram instead of the filesystem
    #[arg(long = "from-text", value_name = "FILE", conflicts_with = "random")]
    from_text: Option<PathBuf>,

    /// Generate a random tree instead of reading the filesystem
    #[arg(long = "random")]
    random: bool,

    /// Seed for --random
    #[arg(long = "seed", requires = "random")]
    seed: Option<u64>,

    /// Deepest folder level --random may fill
    #[arg(long = "random-depth", default_value = "2")]
    random_depth: usize,

    /// Create the tree under DEST instead of printing it
    #[arg(long = "realize", value_name = "DEST", conflicts_with = "json")]
    realize: Option<PathBuf>,

    /// Output the tree as JSON
    #[arg(long = "json")]
    json: bool,

    /// Print the resolved style tokens as JSON and exit
    #[arg(long = "show-style")]
    show_style: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,
}

/// Where the tree comes from.
enum Source {
    Disk(SystemNode),
    Mock(MockNode),
}

impl Args {
    fn style_options(&self) -> StyleOptions {
        StyleOptions {
            style: self.style.clone(),
            indent: self.indent,
            uniform: self.uniform.clone(),
            anystart: self.anystart.clone(),
            anyend: self.anyend.clone(),
            tokens: TokenOverrides {
                split: self.split.clone(),
                extend: self.extend.clone(),
                space: self.space.clone(),
                final_: self.final_token.clone(),
                folderstart: self.folderstart.clone(),
                filestart: self.filestart.clone(),
                folderend: self.folderend.clone(),
                fileend: self.fileend.clone(),
            },
        }
    }

    fn render_options(&self) -> sprig::Result<RenderOptions> {
        let sort_key = self.sort_by.and_then(|key| match key {
            SortBy::Name => None,
            SortBy::Length => Some(SortKey::by(|name: &str| name.len())),
            SortBy::Extension => Some(SortKey::by(|name: &str| {
                let ext = name.rsplit_once('.').map(|(_, ext)| ext.to_string());
                (ext, name.to_string())
            })),
        });
        let with_ignored = |patterns: &[String]| -> Vec<String> {
            patterns.iter().chain(&self.ignore).cloned().collect()
        };

        Ok(RenderOptions {
            depth_limit: self.level,
            item_limit: self.items.as_deref().map(str::parse::<ItemLimit>).transpose()?,
            beyond: self.beyond.as_deref().map(str::parse::<Beyond>).transpose()?,
            first: self.first.map(|first| match first {
                FirstArg::Files => First::Files,
                FirstArg::Folders => First::Folders,
            }),
            sort: self.sort || self.sort_by.is_some(),
            sort_reverse: self.reverse,
            sort_key,
            include_folders: self.include_folders.clone(),
            exclude_folders: with_ignored(&self.exclude_folders),
            include_files: self.include_files.clone(),
            exclude_files: with_ignored(&self.exclude_files),
            pattern_mode: match self.match_mode {
                MatchMode::Literal => PatternMode::Literal,
                MatchMode::Regex => PatternMode::Regex,
                MatchMode::Glob => PatternMode::Glob,
            },
            acceptable_errors: if self.ignore_denied {
                vec![io::ErrorKind::PermissionDenied]
            } else {
                Vec::new()
            },
            denied_string: self
                .denied_string
                .clone()
                .unwrap_or_else(|| sprig::output::DEFAULT_DENIED_STRING.to_string()),
            ..RenderOptions::with_style(&self.style_options())?
        })
    }

    fn source(&self) -> sprig::Result<Source> {
        if let Some(ref file) = self.from_text {
            let text = fs::read_to_string(file).map_err(|source| Error::Io {
                path: file.clone(),
                source,
            })?;
            return Ok(Source::Mock(parse_tree(&text, &ParseOptions::default())?));
        }
        if self.random {
            let config = RandomTreeConfig {
                depth: self.random_depth,
                seed: self.seed,
                ..Default::default()
            };
            return Ok(Source::Mock(random_tree(&config)?));
        }
        Ok(Source::Disk(SystemNode::open(&self.path)?))
    }
}

fn run(args: &Args) -> sprig::Result<()> {
    if args.show_style {
        return print_style_json(&args.style_options().resolve()?);
    }

    let options = args.render_options()?;
    debug!("render options: {:?}", options);
    let source = args.source()?;

    if args.json || args.realize.is_some() {
        let tree = match source {
            Source::Disk(node) => MockNode::snapshot(&node, &options)?,
            Source::Mock(node) => MockNode::snapshot(&node, &options)?,
        };
        return match args.realize {
            Some(ref dest) => tree.realize(dest),
            None => print_json(&tree),
        };
    }

    let use_color = should_use_color(args.color);
    let formatter = TreeFormatter::new(options);
    match source {
        Source::Disk(node) => formatter.print(&node, use_color),
        Source::Mock(node) => formatter.print(&node, use_color),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("sprig: {}", e);
        process::exit(1);
    }
}
