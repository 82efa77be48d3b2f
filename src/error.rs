//! Typed failures of a pick run.
//!
//! Every variant is fatal to the current run. Nothing in the library
//! catches or converts these. Command runners pass them up inside
//! `anyhow::Error`; `main` recovers the typed error and hands it to miette,
//! which prints the message together with its `help` line.

use std::{io, path::PathBuf};

use miette::Diagnostic;

#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum PickError
{
    #[error("Cannot extract slice number and version from {filename:?}")]
    #[diagnostic(help("expected digits, an optional lowercase version letter, then the extension, e.g. 0042a.bmp"))]
    UnparseableFilename
    {
        filename: String
    },

    #[error("Selection interval is not configured")]
    #[diagnostic(help("pass --interval N or set pick.interval in slicepick.toml (must be > 0)"))]
    IntervalNotConfigured,

    #[error("No files to pick from")]
    EmptyInput,

    #[error("No candidates in the window starting at target {target}")]
    #[diagnostic(help("the input is out of order or contains duplicates; try --order numeric"))]
    NoCandidatesInWindow
    {
        target: u64
    },

    #[error("Failed to write picked files to {}", path.display())]
    ExportWriteFailure
    {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type PickResult<T> = std::result::Result<T, PickError>;
