mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{formats, parse, render, text, ParseArgs, RenderArgs, TextArgs};
use config::{resolve_cwd, Config};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Richtext CLI - parse, normalise and render rich text markup
#[derive(Parser, Debug)]
#[command(name = "richtext")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to richtext.config.json in the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse markup and print the Value as JSON
    Parse(ParseArgs),

    /// Print normalised markup
    Render(RenderArgs),

    /// Print the plain text content
    Text(TextArgs),

    /// List the registered format types
    Formats,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = resolve_cwd()?;
    let config = Config::load(&cwd, cli.config.as_deref())?;

    match cli.command {
        Command::Parse(args) => parse(args, &config),
        Command::Render(args) => render(args, &config),
        Command::Text(args) => text(args, &config),
        Command::Formats => formats(&config),
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
