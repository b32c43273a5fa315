use anyhow::{Context, Result};
use clap::Parser;
use tickle::{cli, config, reporter, walker};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    // Load configuration
    let file_config =
        config::load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let scan_config = config::resolve(&cli, file_config);

    debug!(
        roots = ?scan_config.roots,
        markers = ?scan_config.active_markers,
        ignore = ?scan_config.ignore_patterns,
        "starting scan"
    );

    let outcome = walker::run_scan(&scan_config).context("Invalid scan configuration")?;

    for warning in &outcome.warnings {
        warn!("{}", warning);
    }

    let options = reporter::RenderOptions {
        summary: !cli.no_summary,
    };
    let output =
        reporter::render_with_options(&outcome.result, scan_config.output_format, options)
            .context("Failed to render report")?;

    reporter::write_report(&output, cli.output.as_deref()).context("Failed to write report")?;

    Ok(())
}

/// Log to stderr; `TICKLE_LOG` overrides the level chosen by `--verbose`
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "tickle=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("TICKLE_LOG").unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
