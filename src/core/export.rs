//! Selected files, as names and as a newline-delimited listing.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::debug;

use crate::{
    core::slice::ParsedFile,
    error::{PickError, PickResult},
};

/// Filename of the listing written into the output directory.
pub const PICKED_FILES_NAME: &str = "picked_files.txt";

/// Ordered outcome of one selection run. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionResult
{
    entries: Vec<ParsedFile>,
}

impl SelectionResult
{
    pub(crate) fn new(entries: Vec<ParsedFile>) -> Self
    {
        Self { entries }
    }

    pub fn entries(&self) -> &[ParsedFile]
    {
        &self.entries
    }

    /// Selected filenames in selection order (never re-sorted).
    pub fn names(&self) -> Vec<&str>
    {
        self.entries
            .iter()
            .map(|e| e.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize
    {
        self.entries
            .len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.entries
            .is_empty()
    }

    /// One filename per line, each newline-terminated.
    pub fn to_listing(&self) -> String
    {
        let mut out = String::with_capacity(
            self.entries
                .iter()
                .map(|e| e.name.len() + 1)
                .sum(),
        );

        for name in self.names()
        {
            out.push_str(name);
            out.push('\n');
        }

        out
    }

    /// Write the listing to `path`, replacing any existing content.
    pub fn export(
        &self,
        path: &Path,
    ) -> PickResult<()>
    {
        debug!(path = %path.display(), entries = self.len(), "writing listing");

        fs::write(path, self.to_listing()).map_err(|source| PickError::ExportWriteFailure {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write `<dir>/picked_files.txt` and return its path.
    pub fn export_to_dir(
        &self,
        dir: &Path,
    ) -> PickResult<PathBuf>
    {
        let path = dir.join(PICKED_FILES_NAME);
        self.export(&path)?;
        Ok(path)
    }
}
