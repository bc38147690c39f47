mod cli;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::Cli;
use mediascore::config::{self, Config};
use mediascore::pipeline::{Pipeline, PipelineError};
use mediascore::render::render_report;
use mediascore::resolver::{ProviderSet, RatingResolver};
use mediascore::signal;
use mediascore_db::store::{self, RatingCache};
use tokio_util::sync::CancellationToken;

async fn run(cli: Cli, config: Config) -> Result<()> {
    let cancel = CancellationToken::new();
    let signals = signal::cancel_on_signal(cancel.clone());

    let cache = Arc::new(open_cache(&config, cli.clean)?);
    let providers =
        ProviderSet::from_config(&config).context("Failed to set up rating providers")?;
    let resolver = RatingResolver::new(cache.clone(), providers);
    let pipeline = Pipeline::new(resolver, &config.pipeline, cancel.clone());

    let result = pipeline.run(&cli.dirs).await;
    cache.close();

    let report = match result {
        Ok(report) => report,
        // Signalled: no tables, non-zero exit.
        Err(PipelineError::Cancelled) => std::process::exit(1),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        movies = report.movies.len(),
        episodes = report.tv.len(),
        cached = report.cache_hits,
        "Finished"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render_report(&report, &mut out).context("Failed to write rating tables")?;
    out.flush()?;

    cancel.cancel();
    let _ = signals.await;
    Ok(())
}

/// Open the rating stores, removing them first when asked to.
fn open_cache(config: &Config, clean: bool) -> Result<RatingCache> {
    let Some(root) = config.cache_root() else {
        tracing::warn!("No user cache directory available; results will not be cached");
        return Ok(RatingCache::unavailable("no user cache directory"));
    };

    if clean {
        store::clean(&root)
            .with_context(|| format!("Failed to clean cache at {}", root.display()))?;
        tracing::info!("Cleaned rating cache at {}", root.display());
    }

    tracing::debug!("Using rating cache at {}", root.display());
    Ok(RatingCache::open_with_pool_size(
        &root,
        config.pipeline.cache_connections(),
    ))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.dirs.is_empty() {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    }

    let config = config::load_config_or_default(cli.config.as_deref())?;

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose || config.debug {
            "mediascore=debug,mediascore_db=debug,mediascore_parser=debug,mediascore_common=debug"
                .to_string()
        } else {
            "mediascore=info,mediascore_db=info,mediascore_parser=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    config::validate_config(&config)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(cli, config))
}
