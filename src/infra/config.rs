use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    cli::{AppContext, InitArgs},
    core::{select::SortOrder, slice::DEFAULT_EXTENSION},
};

/// Config file names, checked in priority order.
pub const CONFIG_FILES: [&str; 4] =
    ["slicepick.toml", "slicepick.yaml", "slicepick.json", ".slicepick.toml"];

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Selection settings
    pub pick: PickConfig,

    /// Batch shrink job settings
    pub shrink: ShrinkConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PickConfig
{
    /// Keep one file every `interval` slices. No default on purpose.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,

    /// Image extension, without the dot
    pub extension: String,

    /// Pre-scan ordering
    pub order: SortOrder,

    /// Where picked_files.txt is written
    pub output_dir: PathBuf,

    /// Extra glob patterns to skip during directory scans
    pub ignore_patterns: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ShrinkConfig
{
    /// Every basename that should end up shrunk
    pub all_files: PathBuf,

    /// Basenames that failed once and are not retried
    pub error_files: PathBuf,

    /// Full-resolution images land here
    pub originals_dir: PathBuf,

    /// Shrunk images are written here
    pub downsamples_dir: PathBuf,

    /// External shrink tool, called as `tool <input> <output>`
    pub tool: PathBuf,

    /// Seconds to sleep when no original is ready
    pub poll_secs: u64,
}

impl Default for PickConfig
{
    fn default() -> Self
    {
        Self {
            interval: None,
            extension: DEFAULT_EXTENSION.to_string(),
            order: SortOrder::default(),
            output_dir: PathBuf::from("."),
            ignore_patterns: Vec::new(),
        }
    }
}

impl Default for ShrinkConfig
{
    fn default() -> Self
    {
        Self {
            all_files: PathBuf::from("config/all_files.txt"),
            error_files: PathBuf::from("config/error_files.txt"),
            originals_dir: PathBuf::from("images/originals"),
            downsamples_dir: PathBuf::from("images/downsamples"),
            tool: PathBuf::from("itk/ShrinkImage"),
            poll_secs: 10,
        }
    }
}

/// Load config from the working directory.
pub fn load_config() -> Result<Config>
{
    load_config_from(Path::new("."))
}

/// Load config from the first config file found in `dir`, overlaid with
/// `SLICEPICK_*` environment variables (`__` separates sections, e.g.
/// `SLICEPICK_PICK__INTERVAL=10`).
pub fn load_config_from(dir: &Path) -> Result<Config>
{
    let mut builder = config::Config::builder();

    for name in &CONFIG_FILES
    {
        let path = dir.join(name);
        if path.exists()
        {
            debug!(path = %path.display(), "using config file");
            builder = builder.add_source(config::File::from(path));
            break;
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("SLICEPICK")
            .prefix_separator("_")
            .separator("__"),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join(CONFIG_FILES[0]);

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    if ctx.dry_run
    {
        if !ctx.quiet
        {
            println!("DRY RUN: Would write {}:\n{}", config_path.display(), toml_string);
        }
        return Ok(());
    }

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}
