//! Filename parsing: `0042a.bmp` -> position 42, versioned.
//!
//! The pattern is anchored at the end of the name only, so any prefix
//! before the digit run is tolerated (`scan_0042.bmp`). The separator in
//! front of the extension is a literal dot.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PickError, PickResult};

/// Extension used when nothing else is configured.
pub const DEFAULT_EXTENSION: &str = "bmp";

/// One filename with its slice position and version flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFile
{
    /// Original filename, unmodified
    pub name: String,
    /// Slice number taken from the trailing digit run
    pub position: u64,
    /// True when a single letter sits between the digits and the extension.
    /// The letter itself is never compared.
    pub has_version: bool,
}

/// Compiled filename matcher for a single extension.
#[derive(Debug, Clone)]
pub struct SliceParser
{
    regex: Regex,
}

impl SliceParser
{
    /// Build a parser for `extension` (with or without a leading dot).
    pub fn new(extension: &str) -> Result<Self>
    {
        let ext = extension.trim_start_matches('.');
        let pattern = format!(r"(\d+)([a-z])?\.{}$", regex::escape(ext));

        let regex = Regex::new(&pattern)
            .with_context(|| format!("Invalid filename pattern for extension {ext:?}"))?;

        Ok(Self { regex })
    }

    /// Parse one filename. No fallback interpretation exists.
    pub fn parse(
        &self,
        filename: &str,
    ) -> PickResult<ParsedFile>
    {
        let unparseable = || PickError::UnparseableFilename { filename: filename.to_string() };

        let caps = self
            .regex
            .captures(filename)
            .ok_or_else(unparseable)?;

        // A digit run too long for u64 is as unusable as no digits at all
        let position = caps[1]
            .parse::<u64>()
            .map_err(|_| unparseable())?;

        Ok(ParsedFile {
            name: filename.to_string(),
            position,
            has_version: caps
                .get(2)
                .is_some(),
        })
    }

    /// Parse every name, failing on the first one that does not match.
    pub fn parse_all<I, S>(
        &self,
        filenames: I,
    ) -> PickResult<Vec<ParsedFile>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        filenames
            .into_iter()
            .map(|name| self.parse(name.as_ref()))
            .collect()
    }
}
