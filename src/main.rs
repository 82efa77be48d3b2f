use clap::Parser;
use miette::Report;
use slicepick::{
    PickError,
    cli::{AppContext, Cli, Commands},
};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8, no_color: bool) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .init();
}

/// Typed pick failures keep their diagnostic help; anything else prints
/// its context chain.
fn report(err: anyhow::Error) -> Report {
    match err.downcast::<PickError>() {
        Ok(pick) => Report::new(pick),
        Err(other) => miette::miette!("{other:#}"),
    }
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.no_color);

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        dry_run: cli.dry_run,
    };

    let outcome = match cli.command {
        Commands::Pick(args) => slicepick::pick_run(args, &ctx),
        Commands::Shrink(args) => slicepick::shrink_run(args, &ctx),
        Commands::Init(args) => slicepick::infra::config::init(args, &ctx),
        Commands::Completions(args) => slicepick::completion::run(args, &ctx),
    };

    outcome.map_err(report)
}
