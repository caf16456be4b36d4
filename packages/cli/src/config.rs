use anyhow::{Context, Result};
use richtext_model::{FormatType, FormatTypeStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "richtext.config.json";

/// Richtext configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Keep white space and newlines verbatim instead of collapsing them
    #[serde(default)]
    pub preserve_white_space: bool,

    /// Text shown in an empty editable element
    #[serde(default)]
    pub placeholder: Option<String>,

    /// Register the built-in `core/*` format types
    #[serde(default = "default_core_formats")]
    pub core_formats: bool,

    /// Additional format types, registered after the core ones
    #[serde(default)]
    pub format_types: Vec<FormatType>,
}

fn default_core_formats() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preserve_white_space: false,
            placeholder: None,
            core_formats: default_core_formats(),
            format_types: vec![],
        }
    }
}

impl Config {
    /// Load `path`, or `richtext.config.json` in `cwd` when no path is given.
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error.
    pub fn load(cwd: &Path, path: Option<&Path>) -> Result<Self> {
        let (config_path, explicit) = match path {
            Some(path) => (cwd.join(path), true),
            None => (cwd.join(DEFAULT_CONFIG_NAME), false),
        };

        if !explicit && !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        Ok(config)
    }

    /// Build the registry: core types first, then the configured ones.
    pub fn registry(&self) -> Result<FormatTypeStore> {
        let mut store = FormatTypeStore::new();

        let core = if self.core_formats { core_format_types() } else { vec![] };
        for format_type in core.into_iter().chain(self.format_types.iter().cloned()) {
            let name = format_type.name.clone();
            store
                .add(format_type)
                .with_context(|| format!("Invalid format type {name}"))?;
        }

        Ok(store)
    }
}

/// The format types every editor ships with.
pub fn core_format_types() -> Vec<FormatType> {
    vec![
        FormatType::new("core/bold", "strong").with_title("Bold"),
        FormatType::new("core/italic", "em").with_title("Italic"),
        FormatType::new("core/link", "a")
            .with_attribute("url", "href")
            .with_attribute("type", "data-type")
            .with_attribute("id", "data-id")
            .with_attribute("target", "target")
            .with_attribute("rel", "rel")
            .with_title("Link"),
        FormatType::new("core/code", "code").with_title("Inline code"),
        FormatType::new("core/strikethrough", "s").with_title("Strikethrough"),
        FormatType::new("core/subscript", "sub").with_title("Subscript"),
        FormatType::new("core/superscript", "sup").with_title("Superscript"),
        FormatType::new("core/keyboard", "kbd").with_title("Keyboard input"),
        FormatType::new("core/underline", "u").with_title("Underline"),
        FormatType::new("core/image", "img")
            .with_attribute("className", "class")
            .with_attribute("style", "style")
            .with_attribute("url", "src")
            .with_attribute("alt", "alt")
            .non_editable()
            .as_object()
            .with_title("Inline image"),
    ]
}

pub fn resolve_cwd() -> Result<PathBuf> {
    std::env::current_dir().context("Cannot get current directory")
}
