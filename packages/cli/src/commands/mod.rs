pub mod formats;
pub mod parse;
pub mod render;
pub mod text;

pub use formats::formats;
pub use parse::{parse, ParseArgs};
pub use render::{render, RenderArgs};
pub use text::{text, TextArgs};

use anyhow::{Context, Result};
use richtext_model::Value;
use richtext_parser::{create_from_html, CreateOptions};
use std::io::Read;
use std::path::Path;

use crate::config::Config;

/// Read a path, or stdin for `-`.
pub fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        return Ok(buffer);
    }

    std::fs::read_to_string(Path::new(input)).with_context(|| format!("Failed to read {input}"))
}

/// Parse markup the way the configuration asks for.
pub fn parse_markup(html: &str, config: &Config, preserve_white_space: bool) -> Result<Value> {
    let registry = config.registry()?;
    let options = CreateOptions {
        collapse_white_space: !(preserve_white_space || config.preserve_white_space),
        ..CreateOptions::default()
    };
    Ok(create_from_html(html, &registry, options))
}
