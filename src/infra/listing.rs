//! Where the filenames come from.
//!
//! The engine only needs a finished list of names. A directory scan
//! covers local copies; a listing file covers a saved remote listing
//! (one name per line), which is how remote originals reach this tool.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::debug;

use crate::infra::walk::FileWalker;

/// A finished, synchronous source of candidate filenames.
pub trait ListingSource
{
    /// All filenames, in no particular order.
    fn filenames(&self) -> Result<Vec<String>>;

    /// Human-readable origin for logs and dry runs.
    fn describe(&self) -> String;
}

/// Files with the configured extension inside a directory, top level
/// only unless made recursive.
pub struct DirectorySource
{
    root: PathBuf,
    walker: FileWalker,
}

impl DirectorySource
{
    pub fn new(
        root: impl Into<PathBuf>,
        extension: &str,
        ignore_patterns: &[String],
    ) -> Result<Self>
    {
        Ok(Self {
            root: root.into(),
            walker: FileWalker::new(extension, ignore_patterns)?,
        })
    }

    /// (Optional) Descend into subdirectories.
    pub fn with_recursive(
        mut self,
        recursive: bool,
    ) -> Self
    {
        let depth = if recursive { None } else { Some(1) };
        self.walker = self
            .walker
            .with_max_depth(depth);
        self
    }

    /// (Optional) Keep dotfiles such as `._0001.bmp`.
    pub fn with_include_hidden(
        mut self,
        include_hidden: bool,
    ) -> Self
    {
        self.walker = self
            .walker
            .with_include_hidden(include_hidden);
        self
    }
}

impl ListingSource for DirectorySource
{
    fn filenames(&self) -> Result<Vec<String>>
    {
        if !self
            .root
            .is_dir()
        {
            anyhow::bail!("Not a directory: {}", self.root.display());
        }

        let names = self
            .walker
            .walk_names(&self.root);
        debug!(root = %self.root.display(), count = names.len(), "scanned directory");
        Ok(names)
    }

    fn describe(&self) -> String
    {
        format!("directory {}", self.root.display())
    }
}

/// Newline-delimited listing file.
pub struct ListingFileSource
{
    path: PathBuf,
}

impl ListingFileSource
{
    pub fn new(path: impl Into<PathBuf>) -> Self
    {
        Self { path: path.into() }
    }
}

impl ListingSource for ListingFileSource
{
    fn filenames(&self) -> Result<Vec<String>>
    {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read listing {}", self.path.display()))?;

        Ok(parse_listing(&text))
    }

    fn describe(&self) -> String
    {
        format!("listing {}", self.path.display())
    }
}

/// Split listing text into names, skipping blank lines.
pub fn parse_listing(text: &str) -> Vec<String>
{
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whitespace-separated words from a file that must exist.
pub fn read_words(path: &Path) -> Result<Vec<String>>
{
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(text
        .split_whitespace()
        .map(str::to_string)
        .collect())
}

/// Like [`read_words`], but a missing file reads as empty.
pub fn read_words_if_exists(path: &Path) -> Result<Vec<String>>
{
    if !path.exists()
    {
        return Ok(Vec::new());
    }

    read_words(path)
}

#[cfg(test)]
mod tests
{
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_listing_trims_and_skips_blank_lines()
    {
        let names = parse_listing("  0001.bmp\n\n0002a.bmp  \r\n\t\n0003.bmp");
        assert_eq!(names, vec!["0001.bmp", "0002a.bmp", "0003.bmp"]);
    }

    #[test]
    fn test_listing_file_source_reads_names() -> Result<()>
    {
        let tmp = TempDir::new()?;
        let path = tmp
            .path()
            .join("remote.txt");
        fs::write(&path, "10.bmp\n20.bmp\n")?;

        let source = ListingFileSource::new(&path);
        assert_eq!(source.filenames()?, vec!["10.bmp", "20.bmp"]);
        assert!(
            source
                .describe()
                .contains("remote.txt")
        );
        Ok(())
    }

    #[test]
    fn test_missing_listing_is_an_error()
    {
        let source = ListingFileSource::new("/definitely/not/here.txt");
        assert!(
            source
                .filenames()
                .is_err()
        );
    }

    #[test]
    fn test_directory_source_requires_directory() -> Result<()>
    {
        let tmp = TempDir::new()?;
        let file = tmp
            .path()
            .join("1.bmp");
        fs::write(&file, b"BM")?;

        let source = DirectorySource::new(&file, "bmp", &[])?;
        assert!(
            source
                .filenames()
                .is_err()
        );

        let source = DirectorySource::new(tmp.path(), "bmp", &[])?;
        assert_eq!(source.filenames()?, vec!["1.bmp"]);
        Ok(())
    }

    #[test]
    fn test_directory_source_scan_options() -> Result<()>
    {
        let tmp = TempDir::new()?;
        fs::create_dir_all(tmp.path().join("stack2"))?;
        fs::write(tmp.path().join("1.bmp"), b"BM")?;
        fs::write(tmp.path().join("._1.bmp"), b"BM")?;
        fs::write(tmp.path().join("stack2/2.bmp"), b"BM")?;

        let flat = DirectorySource::new(tmp.path(), "bmp", &[])?;
        assert_eq!(flat.filenames()?, vec!["1.bmp"]);

        let deep = DirectorySource::new(tmp.path(), "bmp", &[])?.with_recursive(true);
        assert_eq!(deep.filenames()?, vec!["1.bmp", "2.bmp"]);

        let hidden = DirectorySource::new(tmp.path(), "bmp", &[])?.with_include_hidden(true);
        assert_eq!(hidden.filenames()?, vec!["._1.bmp", "1.bmp"]);
        Ok(())
    }

    #[test]
    fn test_words_from_missing_file_are_empty() -> Result<()>
    {
        let tmp = TempDir::new()?;
        assert!(read_words_if_exists(&tmp.path().join("none.txt"))?.is_empty());

        let path = tmp
            .path()
            .join("words.txt");
        fs::write(&path, "a b\nc\n")?;
        assert_eq!(read_words_if_exists(&path)?, vec!["a", "b", "c"]);
        Ok(())
    }

    #[test]
    fn test_strict_words_require_the_file() -> Result<()>
    {
        let tmp = TempDir::new()?;
        let err = read_words(&tmp.path().join("none.txt")).unwrap_err();
        assert!(err.to_string().contains("none.txt"));
        Ok(())
    }
}
