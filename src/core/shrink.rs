//! `slicepick shrink`: batch-run an external shrink tool over originals.
//!
//! Originals arrive in one directory (copied in by some other process);
//! each is shrunk into the downsamples directory and then removed. The job
//! polls until every basename from the master list is either shrunk or
//! recorded as failed. Strictly sequential.

use std::{
    collections::HashSet,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    process::Command,
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    cli::{AppContext, ShrinkArgs},
    core::slice::DEFAULT_EXTENSION,
    infra::{
        config::{ShrinkConfig, load_config},
        listing::{read_words, read_words_if_exists},
        walk::FileWalker,
    },
};

/// Shrinks one image into another file.
pub trait Shrinker
{
    /// `Ok(false)` means the tool ran and reported failure. `Err` means it
    /// could not be run at all, which aborts the job.
    fn shrink(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<bool>;
}

/// Runs `tool <input> <output>` and checks the exit status.
pub struct CommandShrinker
{
    tool: PathBuf,
}

impl CommandShrinker
{
    pub fn new(tool: impl Into<PathBuf>) -> Self
    {
        Self { tool: tool.into() }
    }
}

impl Shrinker for CommandShrinker
{
    fn shrink(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<bool>
    {
        let status = Command::new(&self.tool)
            .arg(input)
            .arg(output)
            .status()
            .with_context(|| format!("Failed to run shrink tool {}", self.tool.display()))?;

        if !status.success()
        {
            debug!(tool = %self.tool.display(), ?status, "shrink tool failed");
        }
        Ok(status.success())
    }
}

/// Files and directories the job works on.
#[derive(Debug, Clone)]
pub struct ShrinkLayout
{
    pub all_files: PathBuf,
    pub error_files: PathBuf,
    pub originals_dir: PathBuf,
    pub downsamples_dir: PathBuf,
    pub extension: String,
}

/// What happened to one original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShrinkOutcome
{
    Shrunk,
    Failed,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ShrinkReport
{
    pub shrunk: usize,
    pub failed: usize,
    pub idle_polls: usize,
}

pub struct ShrinkJob<S: Shrinker>
{
    layout: ShrinkLayout,
    shrinker: S,
    poll: Duration,
    max_idle_polls: Option<usize>,
}

impl<S: Shrinker> ShrinkJob<S>
{
    pub fn new(
        layout: ShrinkLayout,
        shrinker: S,
    ) -> Self
    {
        Self { layout, shrinker, poll: Duration::from_secs(10), max_idle_polls: None }
    }

    /// (Optional) Sleep between empty polls.
    pub fn with_poll(
        mut self,
        poll: Duration,
    ) -> Self
    {
        self.poll = poll;
        self
    }

    /// (Optional) Fail after this many consecutive empty polls.
    pub fn with_max_idle_polls(
        mut self,
        max: Option<usize>,
    ) -> Self
    {
        self.max_idle_polls = max;
        self
    }

    fn file_name(
        &self,
        basename: &str,
    ) -> String
    {
        format!("{basename}.{}", self.layout.extension)
    }

    /// Basenames with the job's extension directly inside `dir`, sorted.
    fn basenames_in(
        &self,
        dir: &Path,
    ) -> Result<Vec<String>>
    {
        if !dir.is_dir()
        {
            return Ok(Vec::new());
        }

        let walker = FileWalker::new(&self.layout.extension, &[])?;
        Ok(walker
            .walk_files(dir)
            .iter()
            .filter_map(|p| p.file_stem())
            .map(|s| {
                s.to_string_lossy()
                    .into_owned()
            })
            .collect())
    }

    /// Master list minus already shrunk minus known failures, in master order.
    /// The master list must exist; the failure list may not yet.
    pub fn pending(&self) -> Result<Vec<String>>
    {
        let all = read_words(&self.layout.all_files).context("Master file list is required")?;
        let errors = read_words_if_exists(&self.layout.error_files)?;
        let done = self.basenames_in(&self.layout.downsamples_dir)?;

        let skip: HashSet<&str> = done
            .iter()
            .chain(errors.iter())
            .map(String::as_str)
            .collect();

        Ok(all
            .into_iter()
            .filter(|b| !skip.contains(b.as_str()))
            .collect())
    }

    /// Originals currently present, sorted.
    pub fn ready(&self) -> Result<Vec<String>>
    {
        self.basenames_in(&self.layout.originals_dir)
    }

    /// Shrink one original, record a failure, and remove the original
    /// either way.
    pub fn process(
        &self,
        basename: &str,
    ) -> Result<ShrinkOutcome>
    {
        let name = self.file_name(basename);
        let input = self
            .layout
            .originals_dir
            .join(&name);
        let output = self
            .layout
            .downsamples_dir
            .join(&name);

        fs::create_dir_all(&self.layout.downsamples_dir).with_context(|| {
            format!("Failed to create {}", self.layout.downsamples_dir.display())
        })?;

        let outcome = if self
            .shrinker
            .shrink(&input, &output)?
        {
            info!(file = %name, "shrunk");
            ShrinkOutcome::Shrunk
        }
        else
        {
            warn!(file = %name, errors = %self.layout.error_files.display(), "shrink failed, recorded");
            self.record_failure(basename)?;
            ShrinkOutcome::Failed
        };

        fs::remove_file(&input)
            .with_context(|| format!("Failed to remove original {}", input.display()))?;

        Ok(outcome)
    }

    fn record_failure(
        &self,
        basename: &str,
    ) -> Result<()>
    {
        if let Some(parent) = self
            .layout
            .error_files
            .parent()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.layout.error_files)
            .with_context(|| format!("Failed to open {}", self.layout.error_files.display()))?;
        writeln!(file, "{basename}")?;
        Ok(())
    }

    /// Loop until nothing is pending.
    pub fn run(
        &self,
        progress: &ProgressBar,
    ) -> Result<ShrinkReport>
    {
        let mut report = ShrinkReport::default();
        let mut idle = 0usize;

        loop
        {
            let pending = self.pending()?;
            if pending.is_empty()
            {
                break;
            }

            match self
                .ready()?
                .first()
            {
                Some(basename) =>
                {
                    idle = 0;
                    progress.set_message(format!(
                        "Shrinking {} ({} pending)",
                        self.file_name(basename),
                        pending.len()
                    ));

                    match self.process(basename)?
                    {
                        ShrinkOutcome::Shrunk => report.shrunk += 1,
                        ShrinkOutcome::Failed => report.failed += 1,
                    }
                }
                None =>
                {
                    idle += 1;
                    report.idle_polls += 1;

                    if let Some(max) = self.max_idle_polls
                    {
                        if idle >= max
                        {
                            anyhow::bail!(
                                "No originals arrived after {idle} polls; {} files still pending",
                                pending.len()
                            );
                        }
                    }

                    progress.set_message(format!(
                        "No files ready yet, sleeping ({} pending)",
                        pending.len()
                    ));
                    thread::sleep(self.poll);
                }
            }
        }

        Ok(report)
    }
}

impl ShrinkLayout
{
    fn resolve(
        args: &ShrinkArgs,
        config: ShrinkConfig,
    ) -> Self
    {
        Self {
            all_files: args
                .all_files
                .clone()
                .unwrap_or(config.all_files),
            error_files: args
                .error_files
                .clone()
                .unwrap_or(config.error_files),
            originals_dir: args
                .originals
                .clone()
                .unwrap_or(config.originals_dir),
            downsamples_dir: args
                .downsamples
                .clone()
                .unwrap_or(config.downsamples_dir),
            extension: args
                .ext
                .as_deref()
                .unwrap_or(DEFAULT_EXTENSION)
                .trim_start_matches('.')
                .to_string(),
        }
    }
}

#[instrument(skip_all)]
pub fn run(
    args: ShrinkArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config = load_config().unwrap_or_else(|e| {
        warn!("ignoring unreadable config: {e:#}");
        Default::default()
    });
    let config = config.shrink;

    let tool = args
        .tool
        .clone()
        .unwrap_or_else(|| config.tool.clone());
    let poll = Duration::from_secs(
        args.poll_secs
            .unwrap_or(config.poll_secs),
    );
    let layout = ShrinkLayout::resolve(&args, config);

    let job = ShrinkJob::new(layout, CommandShrinker::new(&tool))
        .with_poll(poll)
        .with_max_idle_polls(args.max_idle_polls);

    if ctx.dry_run
    {
        if !ctx.quiet
        {
            println!("DRY RUN: Would shrink with {}:", tool.display());
            println!("  Pending: {}", job.pending()?.len());
            println!("  Ready now: {}", job.ready()?.len());
        }
        return Ok(());
    }

    let progress = if ctx.quiet
    {
        ProgressBar::hidden()
    }
    else
    {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };

    let report = job.run(&progress)?;
    progress.finish_with_message("All files have been shrunk");

    if !ctx.quiet
    {
        println!("Shrunk {}, failed {}", report.shrunk, report.failed);
    }

    Ok(())
}
