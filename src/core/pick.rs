//! `slicepick pick`: listing -> parse -> select -> export.

use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::{
    cli::{AppContext, PickArgs},
    core::{
        export::{PICKED_FILES_NAME, SelectionResult},
        select::{Selector, SortOrder},
        slice::SliceParser,
    },
    infra::{
        config::{PickConfig, load_config},
        listing::{DirectorySource, ListingFileSource, ListingSource},
    },
};

/// CLI flags merged over the config file.
#[derive(Debug)]
pub struct PickPlan
{
    pub interval: Option<u64>,
    pub extension: String,
    pub order: SortOrder,
    pub output_dir: PathBuf,
    pub ignore_patterns: Vec<String>,
}

impl PickPlan
{
    pub fn resolve(
        args: &PickArgs,
        config: PickConfig,
    ) -> Self
    {
        let mut ignore_patterns = config.ignore_patterns;
        ignore_patterns.extend(
            args.ignore
                .iter()
                .cloned(),
        );

        Self {
            interval: args
                .interval
                .or(config.interval),
            extension: args
                .ext
                .clone()
                .unwrap_or(config.extension),
            order: args
                .order
                .unwrap_or(config.order),
            output_dir: args
                .output_dir
                .clone()
                .unwrap_or(config.output_dir),
            ignore_patterns,
        }
    }

    fn source(
        &self,
        args: &PickArgs,
    ) -> Result<Box<dyn ListingSource>>
    {
        let source: Box<dyn ListingSource> = match (&args.listing, &args.dir)
        {
            (Some(listing), _) => Box::new(ListingFileSource::new(listing)),
            (None, dir) =>
            {
                let root = dir
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("."));
                Box::new(
                    DirectorySource::new(root, &self.extension, &self.ignore_patterns)?
                        .with_recursive(args.recursive)
                        .with_include_hidden(args.include_hidden),
                )
            }
        };

        Ok(source)
    }
}

/// Parse `names` and run the selection described by `plan`.
pub fn pick_names(
    names: &[String],
    plan: &PickPlan,
) -> Result<SelectionResult>
{
    let parser = SliceParser::new(&plan.extension)?;
    let parsed = parser.parse_all(names)?;

    let result = Selector::new(plan.interval)
        .with_order(plan.order)
        .select(parsed)?;

    Ok(result)
}

#[instrument(skip_all)]
pub fn run(
    args: PickArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config = load_config().unwrap_or_else(|e| {
        warn!("ignoring unreadable config: {e:#}");
        Default::default()
    });
    let plan = PickPlan::resolve(&args, config.pick);
    let source = plan.source(&args)?;

    let names = source
        .filenames()
        .with_context(|| format!("Failed to list files from {}", source.describe()))?;
    info!(source = %source.describe(), files = names.len(), "listing loaded");

    let result = pick_names(&names, &plan)?;

    if args.json
    {
        let payload = json!({
            "source": source.describe(),
            "interval": plan.interval,
            "order": plan.order,
            "total": names.len(),
            "picked": result.entries(),
        });
        println!("{}", serde_json::to_string(&payload)?);
    }
    else if args.stdout
    {
        print!("{}", result.to_listing());
    }

    if args.stdout
    {
        return Ok(());
    }

    let target = plan
        .output_dir
        .join(PICKED_FILES_NAME);

    if ctx.dry_run
    {
        if !ctx.quiet && !args.json
        {
            println!("{}", "DRY RUN: Would write:".yellow());
            println!("  Listing: {}", target.display());
            println!("  Picked: {} of {} files", result.len(), names.len());
        }
        return Ok(());
    }

    let written = result.export_to_dir(&plan.output_dir)?;

    if !ctx.quiet && !args.json
    {
        let summary = format!("Picked {} of {} files", result.len(), names.len());
        if ctx.no_color
        {
            println!("{summary} -> {}", written.display());
        }
        else
        {
            println!("{} -> {}", summary.green(), written.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::error::PickError;

    fn args() -> PickArgs
    {
        PickArgs {
            dir: None,
            listing: None,
            interval: None,
            ext: None,
            order: None,
            output_dir: None,
            ignore: Vec::new(),
            recursive: false,
            include_hidden: false,
            stdout: false,
            json: false,
        }
    }

    fn names(list: &[&str]) -> Vec<String>
    {
        list.iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_cli_flags_override_config()
    {
        let mut a = args();
        a.interval = Some(5);
        a.order = Some(SortOrder::Numeric);
        a.ignore = vec!["*_thumb.bmp".to_string()];

        let config = PickConfig {
            interval: Some(50),
            ignore_patterns: vec!["rejected/**".to_string()],
            ..PickConfig::default()
        };

        let plan = PickPlan::resolve(&a, config);
        assert_eq!(plan.interval, Some(5));
        assert_eq!(plan.order, SortOrder::Numeric);
        assert_eq!(plan.extension, "bmp");
        assert_eq!(plan.ignore_patterns, vec!["rejected/**", "*_thumb.bmp"]);
    }

    #[test]
    fn test_config_interval_used_when_flag_absent()
    {
        let config = PickConfig { interval: Some(50), ..PickConfig::default() };
        assert_eq!(PickPlan::resolve(&args(), config).interval, Some(50));
    }

    #[test]
    fn test_pick_names_reports_typed_errors()
    {
        let plan = PickPlan::resolve(&args(), PickConfig::default());

        let err = pick_names(&names(&["1.bmp"]), &plan).unwrap_err();
        assert!(matches!(err.downcast_ref::<PickError>(), Some(PickError::IntervalNotConfigured)));

        let plan = PickPlan { interval: Some(2), ..plan };
        let err = pick_names(&names(&["1.bmp", "readme.md"]), &plan).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PickError>(),
            Some(PickError::UnparseableFilename { .. })
        ));
    }

    #[test]
    fn test_pick_names_selects()
    {
        let plan = PickPlan {
            interval: Some(10),
            ..PickPlan::resolve(&args(), PickConfig::default())
        };
        let result = pick_names(&names(&["31.bmp", "20.bmp", "10b.bmp", "10.bmp"]), &plan).unwrap();
        assert_eq!(result.names(), vec!["10.bmp", "20.bmp", "31.bmp"]);
    }
}
