use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::select::SortOrder;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
}

#[derive(Parser)]
#[command(name = "slicepick")]
#[command(
    about = "Pick one image per interval from a numbered, multi-versioned scan sequence"
)]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress progress bars and non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Show what would be done without executing
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select one file per interval and write picked_files.txt
    Pick(PickArgs),

    /// Run the external shrink tool over originals as they arrive
    Shrink(ShrinkArgs),

    /// Initialize a slicepick.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
pub struct PickArgs {
    /// Directory to scan for images (default: current directory)
    #[arg(long, conflicts_with = "listing")]
    pub dir: Option<PathBuf>,

    /// Newline-delimited listing of filenames (e.g. a saved remote listing)
    #[arg(long)]
    pub listing: Option<PathBuf>,

    /// Keep one file every N slices
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Image extension to match
    #[arg(long)]
    pub ext: Option<String>,

    /// Ordering applied before the window scan
    #[arg(long, value_enum)]
    pub order: Option<SortOrder>,

    /// Directory that receives picked_files.txt
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Additional glob patterns to ignore during directory scans
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Scan subdirectories of --dir as well
    #[arg(short, long, conflicts_with = "listing")]
    pub recursive: bool,

    /// Keep hidden files (e.g. `._0001.bmp`) during directory scans
    #[arg(long, conflicts_with = "listing")]
    pub include_hidden: bool,

    /// Print picked names to stdout instead of writing the listing
    #[arg(long)]
    pub stdout: bool,

    /// Output results in JSON format (single line)
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ShrinkArgs {
    /// File listing every basename to process
    #[arg(long)]
    pub all_files: Option<PathBuf>,

    /// File collecting basenames whose shrink failed
    #[arg(long)]
    pub error_files: Option<PathBuf>,

    /// Directory where full-resolution originals arrive
    #[arg(long)]
    pub originals: Option<PathBuf>,

    /// Directory receiving shrunk images
    #[arg(long)]
    pub downsamples: Option<PathBuf>,

    /// External shrink tool, called as `tool <input> <output>`
    #[arg(long)]
    pub tool: Option<PathBuf>,

    /// Seconds to wait when no original is ready
    #[arg(long)]
    pub poll_secs: Option<u64>,

    /// Give up after this many consecutive empty polls
    #[arg(long)]
    pub max_idle_polls: Option<usize>,

    /// Image extension to match
    #[arg(long)]
    pub ext: Option<String>,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}
