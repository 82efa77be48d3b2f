//! **slicepick** - pick one image per interval from a numbered scan sequence
//!
//! Filenames like `0042.bmp` / `0042a.bmp` are parsed into a slice position
//! and a version flag, then thinned to one file per fixed-size window along
//! the position axis. Gaps and duplicate captures are tolerated.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Typed errors of a pick run
pub mod error;
pub use error::{PickError, PickResult};

/// Core processing - parsing, selection, export and the batch shrink job
pub mod core {
    /// Filename -> (position, version flag)
    pub mod slice;
    pub use slice::{ParsedFile, SliceParser};

    /// One-file-per-window selection engine
    pub mod select;
    pub use select::{Selector, SortOrder, select};

    /// Selected names and the picked_files.txt listing
    pub mod export;
    pub use export::{PICKED_FILES_NAME, SelectionResult};

    /// `pick` command handler
    pub mod pick;
    pub use pick::run as pick_run;

    /// Polling batch job around an external shrink tool
    pub mod shrink;
    pub use shrink::run as shrink_run;
}

/// Infrastructure - configuration, listing sources and directory walking
pub mod infra {
    /// Configuration management with TOML support
    pub mod config;
    pub use self::config::{Config, init as config_init, load_config};

    /// Filename sources (directory scan, listing file)
    pub mod listing;
    pub use listing::{DirectorySource, ListingFileSource, ListingSource};

    /// Extension-filtered directory walking
    pub mod walk;
    pub use walk::FileWalker;
}

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli, Commands};
pub use self::core::{
    ParsedFile, SelectionResult, Selector, SliceParser, SortOrder, pick_run, select, shrink_run,
};
pub use infra::{Config, load_config};
