//! `slicepick completions`: render a completion script for one shell.
//!
//! The script is rendered into memory first, so printing it and saving it
//! share one path and a dry run can report the exact file it would write.

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{Generator, Shell as CompletionShell, generate};
use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};
use tracing::debug;

use crate::cli::{AppContext, Cli, CompletionsArgs, Shell};

const BIN_NAME: &str = "slicepick";

impl Shell {
    fn generator(&self) -> CompletionShell {
        match self {
            Shell::Bash => CompletionShell::Bash,
            Shell::Zsh => CompletionShell::Zsh,
            Shell::Fish => CompletionShell::Fish,
            Shell::PowerShell => CompletionShell::PowerShell,
            Shell::Elvish => CompletionShell::Elvish,
        }
    }

    /// Conventional script name, e.g. `_slicepick` for zsh.
    pub fn script_name(&self) -> String {
        self.generator().file_name(BIN_NAME)
    }
}

/// Full completion script for `shell`.
pub fn completion_script(shell: &Shell) -> Result<String> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(shell.generator(), &mut cmd, BIN_NAME, &mut buf);

    String::from_utf8(buf).context("completion script is not UTF-8")
}

pub fn run(args: CompletionsArgs, ctx: &AppContext) -> Result<()> {
    let script = completion_script(&args.shell)?;
    debug!(shell = ?args.shell, bytes = script.len(), "rendered completion script");

    if args.stdout {
        io::stdout()
            .write_all(script.as_bytes())
            .context("write completion to stdout")?;
        return Ok(());
    }

    let dir = args
        .out_dir
        .ok_or_else(|| anyhow::anyhow!("--out-dir is required unless --stdout is set"))?;
    let path: PathBuf = dir.join(args.shell.script_name());

    if ctx.dry_run {
        if !ctx.quiet {
            eprintln!("DRY RUN: Would write {} ({} bytes)", path.display(), script.len());
        }
        return Ok(());
    }

    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    fs::write(&path, &script).with_context(|| format!("write {}", path.display()))?;

    if !ctx.quiet {
        eprintln!("Wrote completion to {}", path.display());
    }
    Ok(())
}
