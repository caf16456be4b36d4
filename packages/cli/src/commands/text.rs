use super::{parse_markup, read_input};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use richtext_model::get_text_content;

#[derive(Debug, Args)]
pub struct TextArgs {
    /// Markup file, or `-` for stdin
    pub input: String,
}

pub fn text(args: TextArgs, config: &Config) -> Result<()> {
    let html = read_input(&args.input)?;
    let value = parse_markup(&html, config, false)?;
    println!("{}", get_text_content(&value));
    Ok(())
}
