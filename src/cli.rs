use crate::models::{OutputFormat, SortMode};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tickle")]
#[command(version, about = "Find outstanding tasks in your code", long_about = None)]
pub struct Cli {
    /// Directories to scan (defaults to current directory)
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Comma-separated markers to detect: TODO, FIXME, BUG, NOTE, HACK, CHECKBOX
    #[arg(short, long)]
    pub markers: Option<String>,

    /// Comma-separated glob patterns to skip (e.g. "*.min.js,node_modules")
    #[arg(short, long)]
    pub ignore: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Sort order
    #[arg(short, long, value_enum)]
    pub sort: Option<SortMode>,

    /// Include hidden files and directories (names starting with '.')
    #[arg(long)]
    pub hidden: bool,

    /// Omit the summary panel from text output
    #[arg(long)]
    pub no_summary: bool,

    /// Output file (if not specified, writes to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to custom config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
