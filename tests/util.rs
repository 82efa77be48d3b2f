//! Shared test utilities for integration tests
//!
//! Provides scan-directory fixtures used across multiple test files.

#![allow(dead_code)]

use assert_fs::prelude::*;

/// Create a temp directory holding one tiny file per name.
pub fn make_scan_fixture(names: &[&str]) -> assert_fs::TempDir
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    for name in names
    {
        // Content is irrelevant; only names are read
        tmp.child(name)
            .write_binary(b"BM")
            .expect("write image");
    }

    tmp
}

/// A dense scan: one image per slice from `from` to `to` inclusive,
/// zero-padded to four digits, with a second capture every `dup_every`.
pub fn make_dense_scan(
    from: u64,
    to: u64,
    dup_every: u64,
) -> assert_fs::TempDir
{
    let mut names = Vec::new();
    for n in from..=to
    {
        names.push(format!("{n:04}.bmp"));
        if dup_every > 0 && n % dup_every == 0
        {
            names.push(format!("{n:04}a.bmp"));
        }
    }

    let refs: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .collect();
    make_scan_fixture(&refs)
}
