use super::{parse_markup, read_input};
use crate::config::Config;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Markup file, or `-` for stdin
    pub input: String,

    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,
}

pub fn parse(args: ParseArgs, config: &Config) -> Result<()> {
    let html = read_input(&args.input)?;
    let value = parse_markup(&html, config, false)?;

    let json = if args.compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    println!("{json}");
    Ok(())
}
