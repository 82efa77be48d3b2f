//! Image directory walker.
//! - Non-recursive by default (scan directories are flat), `pick --recursive` lifts the limit
//! - Keeps only regular files with the configured extension
//! - Extra ignore globs, matched against paths relative to the root
//! - Hidden files (e.g. `._0001.bmp` resource forks) skipped by default
//! - Deterministic ordering for stable tests/CI
//!
//! Backed by ripgrep's `ignore` crate and `globset`. VCS ignore files
//! are not consulted: an image directory is data, not a source tree.

use std::path::{Path, PathBuf};

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use tracing::trace;

/// Directory walker restricted to one image extension.
pub struct FileWalker
{
    /// Extension without the leading dot, e.g. "bmp"
    extension: String,

    /// Compiled set of additional ignore patterns
    ignore_patterns: GlobSet,

    /// Include hidden (dot) files; default false
    include_hidden: bool,

    /// Maximum recursion depth; default Some(1) (root entries only)
    max_depth: Option<usize>,
}

impl FileWalker
{
    /// Build a walker for `extension` with additional ignore patterns
    /// (e.g. "*_thumb.bmp", "rejected/**").
    pub fn new(
        extension: &str,
        additional_ignores: &[String],
    ) -> Result<Self>
    {
        let mut builder = GlobSetBuilder::new();

        for pattern in additional_ignores
        {
            builder.add(Glob::new(pattern)?);
        }

        Ok(Self {
            extension: extension
                .trim_start_matches('.')
                .to_string(),
            ignore_patterns: builder.build()?,
            include_hidden: false,
            max_depth: Some(1),
        })
    }

    /// (Optional) Include or exclude hidden files (dotfiles).
    pub fn with_include_hidden(
        mut self,
        include_hidden: bool,
    ) -> Self
    {
        self.include_hidden = include_hidden;
        self
    }

    /// (Optional) Limit recursion depth (`None` = unbounded).
    pub fn with_max_depth(
        mut self,
        depth: Option<usize>,
    ) -> Self
    {
        self.max_depth = depth;
        self
    }

    /// Internal: construct a configured WalkBuilder for `root`.
    fn build_walk(
        &self,
        root: &Path,
    ) -> WalkBuilder
    {
        let mut b = WalkBuilder::new(root);

        // Plain directory listing: no .gitignore/.ignore handling
        b.standard_filters(false);

        //   WalkBuilder::hidden(true)  => *skip* dotfiles
        b.hidden(!self.include_hidden);
        b.max_depth(self.max_depth);

        b
    }

    fn has_extension(
        &self,
        path: &Path,
    ) -> bool
    {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.extension)
    }

    /// Traverse `root` and return matching file paths, **sorted**.
    pub fn walk_files<P: AsRef<Path>>(
        &self,
        root: P,
    ) -> Vec<PathBuf>
    {
        let root_path = root.as_ref();
        let walker = self
            .build_walk(root_path)
            .build();

        let mut out: Vec<PathBuf> = walker
            // Drop entries with IO errors
            .filter_map(|res| res.ok())
            // Keep only regular files
            .filter(|entry| {
                entry
                    .file_type()
                    .is_some_and(|ft| ft.is_file())
            })
            .map(|entry| entry.into_path())
            .filter(|abs| self.has_extension(abs))
            // Extra ignore filtering on the RELATIVE path
            .filter(|abs| {
                let rel = abs
                    .strip_prefix(root_path)
                    .unwrap_or(abs);
                let skip = self
                    .ignore_patterns
                    .is_match(rel);
                if skip
                {
                    trace!(path = %rel.display(), "ignored by pattern");
                }
                !skip
            })
            .collect();

        out.sort();

        out
    }

    /// Bare file names of every matching file under `root`.
    pub fn walk_names<P: AsRef<Path>>(
        &self,
        root: P,
    ) -> Vec<String>
    {
        self.walk_files(root)
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| {
                n.to_string_lossy()
                    .into_owned()
            })
            .collect()
    }
}
