use super::{parse_markup, read_input};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use richtext_model::{normalise_formats, Value};
use richtext_tree::to_html_string;
use tracing::debug;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Markup (or Value JSON with `--from-json`), or `-` for stdin
    pub input: String,

    /// Read a Value as printed by `parse` instead of markup
    #[arg(long)]
    pub from_json: bool,

    /// Keep white space and newlines verbatim
    #[arg(long)]
    pub preserve_white_space: bool,
}

pub fn render(args: RenderArgs, config: &Config) -> Result<()> {
    let source = read_input(&args.input)?;
    let preserve_white_space = args.preserve_white_space || config.preserve_white_space;

    let value = if args.from_json {
        let value: Value = serde_json::from_str(&source).context("Input is not a Value")?;
        value.validate().context("Input is not a valid Value")?;
        normalise_formats(value)
    } else {
        parse_markup(&source, config, args.preserve_white_space)?
    };
    debug!(len = value.len(), "Rendering value");

    let registry = config.registry()?;
    println!("{}", to_html_string(&value, &registry, preserve_white_space));
    Ok(())
}
