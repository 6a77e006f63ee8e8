//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for taskcrew
#[derive(Parser, Debug)]
#[command(name = "taskcrew")]
#[command(author, version, about = "Conversational task assistant with intent routing")]
#[command(long_about = r#"
Taskcrew routes natural-language requests to specialized agents (tasks,
planning, categories, analytics, marketing, projects, messaging), each of
which drives an LLM with declared tools and executes the results against a
task store.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./taskcrew.toml     Project-level config
3. ~/.config/taskcrew/config.toml   Global config

Example:
  taskcrew "I need to do the accounting, due March 27"
  taskcrew --chat
  taskcrew --json "show me the statistics"
"#)]
pub struct Cli {
    /// The message to process (not required in chat mode)
    pub message: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Session identifier; defaults to a fresh session per invocation
    #[arg(short, long, value_name = "ID")]
    pub session: Option<String>,

    /// Print the raw JSON response instead of formatted output
    #[arg(long)]
    pub json: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,
}
