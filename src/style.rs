//! Style registry: named bundles of line-drawing tokens
//!
//! A style is a set of eight tokens. The four connector tokens (`split`,
//! `extend`, `space`, `final`) build the header in front of every line; the
//! four decoration tokens wrap folder and file names.
//!
//! ```text
//! r/            <- folderstart + "r" + folderend
//! ├─a/          <- split
//! │ └─c.txt     <- extend, final
//! └─b.txt       <- final
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Names of the builtin styles, in the order they are listed to users.
pub const STYLE_NAMES: &[&str] = &["lines", "dash", "spaces", "plus", "arrow", "emoji"];

/// Token keys, in canonical order.
pub const TOKEN_KEYS: &[&str] = &[
    "split",
    "extend",
    "space",
    "final",
    "folderstart",
    "filestart",
    "folderend",
    "fileend",
];

const CONNECTOR_KEYS: &[&str] = &["split", "extend", "space", "final"];

/// The resolved tokens used to draw a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleTokens {
    pub split: String,
    pub extend: String,
    pub space: String,
    #[serde(rename = "final")]
    pub final_: String,
    pub folderstart: String,
    pub filestart: String,
    pub folderend: String,
    pub fileend: String,
}

impl StyleTokens {
    fn builtin(connectors: [&str; 4], folderstart: &str, filestart: &str) -> Self {
        let [split, extend, space, final_] = connectors;
        Self {
            split: split.to_string(),
            extend: extend.to_string(),
            space: space.to_string(),
            final_: final_.to_string(),
            folderstart: folderstart.to_string(),
            filestart: filestart.to_string(),
            folderend: "/".to_string(),
            fileend: String::new(),
        }
    }

    /// Look a token up by key name.
    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "split" => &self.split,
            "extend" => &self.extend,
            "space" => &self.space,
            "final" => &self.final_,
            "folderstart" => &self.folderstart,
            "filestart" => &self.filestart,
            "folderend" => &self.folderend,
            "fileend" => &self.fileend,
            _ => return None,
        };
        Some(value)
    }

    /// Replace a token by key name.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        if !TOKEN_KEYS.contains(&key) {
            return Err(Error::config(format!(
                "unknown style token \"{}\", must be one of {}",
                key,
                TOKEN_KEYS.join(", ")
            )));
        }
        *self.slot(key) = value.into();
        Ok(())
    }

    fn connector_mut(&mut self, key: &str) -> &mut String {
        match key {
            "split" => &mut self.split,
            "extend" => &mut self.extend,
            "space" => &mut self.space,
            _ => &mut self.final_,
        }
    }

    fn slot(&mut self, key: &str) -> &mut String {
        match key {
            "folderstart" => &mut self.folderstart,
            "filestart" => &mut self.filestart,
            "folderend" => &mut self.folderend,
            "fileend" => &mut self.fileend,
            connector => self.connector_mut(connector),
        }
    }
}

impl Default for StyleTokens {
    fn default() -> Self {
        StyleTokens::builtin(["├─", "│ ", "  ", "└─"], "", "")
    }
}

/// Resolve a builtin style name to its tokens.
pub fn get_style(name: &str) -> Result<StyleTokens> {
    let tokens = match name {
        "lines" => StyleTokens::default(),
        "dash" => StyleTokens::builtin(["|-", "| ", "  ", "|-"], "", ""),
        "spaces" => StyleTokens::builtin(["  ", "  ", "  ", "  "], "", ""),
        "plus" => StyleTokens::builtin(["+-", "| ", "  ", "+-"], "", ""),
        "arrow" => StyleTokens::builtin(["  ", "  ", "  ", "  "], ">", ">"),
        "emoji" => emoji_style()?,
        _ => {
            return Err(Error::config(format!(
                "style \"{}\" not recognized, must be one of {}",
                name,
                STYLE_NAMES.join(", ")
            )));
        }
    };
    Ok(tokens)
}

#[cfg(feature = "emoji")]
fn emoji_style() -> Result<StyleTokens> {
    Ok(StyleTokens::builtin(
        ["├─", "│ ", "  ", "└─"],
        "\u{1F4C1} ",
        "\u{1F4C4} ",
    ))
}

#[cfg(not(feature = "emoji"))]
fn emoji_style() -> Result<StyleTokens> {
    Err(Error::config(
        "style \"emoji\" requires sprig to be built with the \"emoji\" feature",
    ))
}

/// Re-derive the widths of the connector tokens.
///
/// With 0 the connectors become empty, with 1 only their first character is
/// kept, 2 leaves them untouched and anything larger repeats the final
/// character until the token is `indent` characters wide.
pub fn format_indent(tokens: &mut StyleTokens, indent: usize) {
    for key in CONNECTOR_KEYS {
        let token = tokens.connector_mut(key);
        *token = match indent {
            0 => String::new(),
            1 => token.chars().take(1).collect(),
            2 => continue,
            n => match token.chars().last() {
                Some(last) => {
                    let extra = n.saturating_sub(token.chars().count());
                    let mut widened = token.clone();
                    widened.extend(std::iter::repeat_n(last, extra));
                    widened
                }
                None => continue,
            },
        };
    }
}

/// Per-token overrides; `None` keeps the value coming from the style.
#[derive(Debug, Clone, Default)]
pub struct TokenOverrides {
    pub split: Option<String>,
    pub extend: Option<String>,
    pub space: Option<String>,
    pub final_: Option<String>,
    pub folderstart: Option<String>,
    pub filestart: Option<String>,
    pub folderend: Option<String>,
    pub fileend: Option<String>,
}

impl TokenOverrides {
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, value)| value.is_none())
    }

    fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&String>)> {
        [
            ("split", self.split.as_ref()),
            ("extend", self.extend.as_ref()),
            ("space", self.space.as_ref()),
            ("final", self.final_.as_ref()),
            ("folderstart", self.folderstart.as_ref()),
            ("filestart", self.filestart.as_ref()),
            ("folderend", self.folderend.as_ref()),
            ("fileend", self.fileend.as_ref()),
        ]
        .into_iter()
    }

    /// Write every set override into `tokens`.
    pub fn apply_to(&self, tokens: &mut StyleTokens) {
        for (key, value) in self.iter() {
            if let Some(value) = value {
                *tokens.slot(key) = value.clone();
            }
        }
    }
}

/// Everything needed to resolve the final tokens of a render.
///
/// Precedence, lowest first: the named style, the indent-derived connector
/// widths, the `uniform`/`anystart`/`anyend` shorthands, explicit tokens.
#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub style: String,
    pub indent: usize,
    /// Replaces all four connector tokens.
    pub uniform: Option<String>,
    /// Replaces both start tokens.
    pub anystart: Option<String>,
    /// Replaces both end tokens.
    pub anyend: Option<String>,
    pub tokens: TokenOverrides,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            style: "lines".to_string(),
            indent: 2,
            uniform: None,
            anystart: None,
            anyend: None,
            tokens: TokenOverrides::default(),
        }
    }
}

impl StyleOptions {
    pub fn named(style: &str) -> Self {
        Self {
            style: style.to_string(),
            ..Default::default()
        }
    }

    pub fn resolve(&self) -> Result<StyleTokens> {
        let mut tokens = get_style(&self.style)?;
        format_indent(&mut tokens, self.indent);

        if let Some(ref uniform) = self.uniform {
            for key in CONNECTOR_KEYS {
                *tokens.connector_mut(key) = uniform.clone();
            }
        }
        if let Some(ref start) = self.anystart {
            tokens.folderstart = start.clone();
            tokens.filestart = start.clone();
        }
        if let Some(ref end) = self.anyend {
            tokens.folderend = end.clone();
            tokens.fileend = end.clone();
        }

        self.tokens.apply_to(&mut tokens);
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_is_default() {
        let tokens = get_style("lines").unwrap();
        assert_eq!(tokens, StyleTokens::default());
        assert_eq!(tokens.split, "├─");
        assert_eq!(tokens.final_, "└─");
        assert_eq!(tokens.folderend, "/");
        assert_eq!(tokens.fileend, "");
    }

    #[test]
    fn test_every_listed_builtin_resolves() {
        for name in STYLE_NAMES {
            if *name == "emoji" && cfg!(not(feature = "emoji")) {
                continue;
            }
            assert!(get_style(name).is_ok(), "style {} should resolve", name);
        }
    }

    #[test]
    fn test_unknown_style_is_config_error() {
        let err = get_style("zigzag").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("zigzag"));
    }

    #[cfg(feature = "emoji")]
    #[test]
    fn test_emoji_style_tokens() {
        let tokens = get_style("emoji").unwrap();
        assert_eq!(tokens.folderstart, "📁 ");
        assert_eq!(tokens.filestart, "📄 ");
    }

    #[cfg(not(feature = "emoji"))]
    #[test]
    fn test_emoji_style_needs_feature() {
        let err = get_style("emoji").unwrap_err();
        assert!(err.to_string().contains("emoji"));
    }

    #[test]
    fn test_format_indent_widths() {
        let mut zero = StyleTokens::default();
        format_indent(&mut zero, 0);
        assert_eq!(zero.split, "");
        assert_eq!(zero.extend, "");
        assert_eq!(zero.folderend, "/");

        let mut one = StyleTokens::default();
        format_indent(&mut one, 1);
        assert_eq!(one.split, "├");
        assert_eq!(one.extend, "│");

        let mut four = StyleTokens::default();
        format_indent(&mut four, 4);
        assert_eq!(four.split, "├───");
        assert_eq!(four.extend, "│   ");
        assert_eq!(four.space, "    ");
        assert_eq!(four.final_, "└───");
    }

    #[test]
    fn test_explicit_tokens_beat_indent_and_style() {
        let options = StyleOptions {
            indent: 4,
            tokens: TokenOverrides {
                split: Some(">>".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let tokens = options.resolve().unwrap();
        assert_eq!(tokens.split, ">>");
        assert_eq!(tokens.final_, "└───");
    }

    #[test]
    fn test_shorthands_sit_between_indent_and_explicit() {
        let options = StyleOptions {
            uniform: Some("..".to_string()),
            anystart: Some("*".to_string()),
            anyend: Some("!".to_string()),
            tokens: TokenOverrides {
                fileend: Some("".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let tokens = options.resolve().unwrap();
        assert_eq!(tokens.split, "..");
        assert_eq!(tokens.space, "..");
        assert_eq!(tokens.folderstart, "*");
        assert_eq!(tokens.filestart, "*");
        assert_eq!(tokens.folderend, "!");
        assert_eq!(tokens.fileend, "");
    }

    #[test]
    fn test_get_and_set_by_key() {
        let mut tokens = StyleTokens::default();
        assert_eq!(tokens.get("final"), Some("└─"));
        assert_eq!(tokens.get("nope"), None);
        tokens.set("final", "`-").unwrap();
        assert_eq!(tokens.final_, "`-");
        assert!(tokens.set("nope", "x").is_err());
    }

    #[test]
    fn test_tokens_serialize_with_key_names() {
        let json = serde_json::to_value(get_style("dash").unwrap()).unwrap();
        assert_eq!(json["final"], "|-");
        assert_eq!(json["extend"], "| ");
        assert_eq!(json.as_object().unwrap().len(), TOKEN_KEYS.len());
    }
}
