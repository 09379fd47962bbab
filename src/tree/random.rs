//! Randomly generated mock trees

use std::ops::Range;

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};

use super::mock::MockNode;

/// Builtin vocabulary for generated names.
pub const DEFAULT_WORDS: &[&str] = &[
    "acorn", "almanac", "amber", "anchor", "anvil", "apricot", "arbor", "atlas", "aurora",
    "badger", "ballad", "bamboo", "banner", "barley", "basil", "beacon", "berserk", "birch",
    "bishop", "blossom", "bramble", "breeze", "bristle", "bronze", "buckle", "cabin", "cactus",
    "canyon", "caramel", "cascade", "cedar", "chalk", "cinder", "citrus", "clock", "clover",
    "cobalt", "comet", "copper", "coral", "cotton", "covetous", "crater", "crimson", "cypress",
    "dahlia", "delta", "desert", "discoid", "ditty", "dolphin", "drizzle", "dune", "eclat",
    "ember", "falcon", "fennel", "fjord", "flint", "forge", "fossil", "garnet", "geyser",
    "ginger", "glacier", "granite", "gravel", "harbor", "hazel", "heron", "hickory", "hothouse",
    "indigo", "iris", "island", "ivory", "jasper", "juniper", "kestrel", "kettle", "lagoon",
    "lantern", "larch", "lemon", "lichen", "linen", "lotus", "maple", "marble", "meadow",
    "milord", "mint", "monsoon", "mosaic", "nectar", "nimbus", "nutmeg", "oasis", "obsidian",
    "orchid", "otter", "paprika", "pebble", "peddle", "pepper", "pineapple", "plenty", "plume",
    "prairie", "quarry", "quartz", "quill", "raven", "reef", "ripple", "saffron", "sage",
    "sequoia", "shale", "sierra", "sparrow", "spruce", "summit", "tamarind", "thicket",
    "thistle", "tundra", "valley", "velvet", "visceral", "walnut", "willow", "yarrow", "zephyr",
];

const NAME_ATTEMPTS: usize = 32;

/// Shape of a generated tree.
#[derive(Debug, Clone)]
pub struct RandomTreeConfig {
    /// Name of the generated root folder.
    pub name: String,
    /// Deepest folder level that may still receive children; the root is at
    /// depth 0 and is always populated.
    pub depth: usize,
    /// Files created per populated folder.
    pub files: Range<usize>,
    /// Folders created per populated folder.
    pub folders: Range<usize>,
    /// Probability that a generated folder is left empty.
    pub stop_chance: f64,
    /// Seed for reproducible trees; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// File extensions to pick from, with or without the leading dot.
    pub extensions: Vec<String>,
    pub words: Vec<String>,
}

impl Default for RandomTreeConfig {
    fn default() -> Self {
        Self {
            name: "MyFakeDir".to_string(),
            depth: 2,
            files: 1..4,
            folders: 0..4,
            stop_chance: 0.5,
            seed: None,
            extensions: vec!["txt".to_string()],
            words: DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl RandomTreeConfig {
    fn validate(&self) -> Result<()> {
        if self.files.is_empty() || self.folders.is_empty() {
            return Err(Error::config(format!(
                "file and folder count ranges must not be empty (got {:?} and {:?})",
                self.files, self.folders
            )));
        }
        if self.words.is_empty() {
            return Err(Error::config("word list for random names is empty"));
        }
        if !(0.0..=1.0).contains(&self.stop_chance) {
            return Err(Error::config(format!(
                "stop chance must be between 0 and 1, not {}",
                self.stop_chance
            )));
        }
        Ok(())
    }

    fn normalized_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|ext| {
                if ext.is_empty() || ext.starts_with('.') {
                    ext.clone()
                } else {
                    format!(".{}", ext)
                }
            })
            .collect()
    }
}

/// Generate a new tree rooted at a folder named `config.name`.
pub fn random_tree(config: &RandomTreeConfig) -> Result<MockNode> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let root = MockNode::folder(config.name.as_str());
    populate(&root, config, &mut rng)?;
    Ok(root)
}

/// Add random files, then random folders, to `folder`, and recurse into the
/// new folders that survive the stop chance.
pub fn populate(folder: &MockNode, config: &RandomTreeConfig, rng: &mut StdRng) -> Result<()> {
    config.validate()?;
    let extensions = config.normalized_extensions();
    fill(folder, config, &extensions, rng)
}

fn fill(
    folder: &MockNode,
    config: &RandomTreeConfig,
    extensions: &[String],
    rng: &mut StdRng,
) -> Result<()> {
    let file_count = rng.gen_range(config.files.clone());
    for _ in 0..file_count {
        let ext = extensions.choose(rng).map(String::as_str).unwrap_or("");
        let name = unique_name(folder, &config.words, ext, rng);
        folder.create_file(name)?;
    }

    let folder_count = rng.gen_range(config.folders.clone());
    let mut created = Vec::with_capacity(folder_count);
    for _ in 0..folder_count {
        let name = unique_name(folder, &config.words, "", rng);
        created.push(folder.create_folder(name)?);
    }
    debug!(
        "{}: {} files, {} folders",
        folder.path(),
        file_count,
        folder_count
    );

    for child in created {
        if child.depth() <= config.depth && rng.r#gen::<f64>() > config.stop_chance {
            fill(&child, config, extensions, rng)?;
        }
    }
    Ok(())
}

fn unique_name(folder: &MockNode, words: &[String], ext: &str, rng: &mut StdRng) -> String {
    let mut last = String::new();
    for _ in 0..NAME_ATTEMPTS {
        let word = words.choose(rng).map(String::as_str).unwrap_or("item");
        last = format!("{}{}", word, ext);
        if folder.child(&last).is_none() {
            return last;
        }
    }
    // Small word lists run out of fresh names; number the last pick instead
    let stem = last.strip_suffix(ext).unwrap_or(&last).to_string();
    (2..)
        .map(|n| format!("{}{}{}", stem, n, ext))
        .find(|name| folder.child(name).is_none())
        .unwrap_or(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> RandomTreeConfig {
        RandomTreeConfig {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_same_seed_same_tree() {
        let a = random_tree(&seeded(7)).unwrap();
        let b = random_tree(&seeded(7)).unwrap();
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_counts_respect_ranges_and_depth() {
        let config = RandomTreeConfig {
            depth: 1,
            files: 2..3,
            folders: 1..3,
            stop_chance: 0.0,
            ..seeded(3)
        };
        let root = random_tree(&config).unwrap();
        assert_eq!(root.name(), "MyFakeDir");

        root.walk_apply(|node| {
            assert!(node.depth() <= config.depth + 1);
            if node.is_folder() && node.depth() <= config.depth {
                let files = node.children().iter().filter(|c| c.is_file()).count();
                let folders = node.children().len() - files;
                assert_eq!(files, 2);
                assert!((1..3).contains(&folders));
            }
        });
    }

    #[test]
    fn test_stop_chance_one_only_fills_root() {
        let config = RandomTreeConfig {
            stop_chance: 1.0,
            folders: 2..3,
            ..seeded(11)
        };
        let root = random_tree(&config).unwrap();
        for child in root.children() {
            assert!(child.children().is_empty());
        }
    }

    #[test]
    fn test_extensions_get_a_dot() {
        let config = RandomTreeConfig {
            extensions: vec!["md".to_string(), ".rs".to_string()],
            folders: 0..1,
            ..seeded(5)
        };
        let root = random_tree(&config).unwrap();
        for name in root.child_names() {
            assert!(name.ends_with(".md") || name.ends_with(".rs"), "{}", name);
        }
    }

    #[test]
    fn test_tiny_word_list_still_yields_unique_names() {
        let config = RandomTreeConfig {
            words: vec!["only".to_string()],
            files: 3..4,
            folders: 0..1,
            ..seeded(1)
        };
        let root = random_tree(&config).unwrap();
        assert_eq!(root.child_names(), ["only.txt", "only2.txt", "only3.txt"]);
    }

    #[test]
    fn test_empty_range_is_config_error() {
        let config = RandomTreeConfig {
            files: 2..2,
            ..Default::default()
        };
        assert!(matches!(random_tree(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_populate_extends_existing_folder() {
        let folder = MockNode::folder("mine");
        folder.create_file("keep.me").unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        populate(&folder, &RandomTreeConfig::default(), &mut rng).unwrap();
        assert_eq!(folder.child_names()[0], "keep.me");
        assert!(folder.children().len() > 1);
    }
}
