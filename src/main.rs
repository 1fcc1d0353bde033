// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, to stderr)
// 3. Build the shared HTTP transport and start the crawl
// 4. Print every status record as it arrives
// 5. Exit with proper code (0 = done, 1 = broken links with --fail-on-broken,
//    2 = error such as no seed URLs)
//
// stdout carries nothing but results, so the output can be piped into other
// tools. Everything else (progress, warnings, summaries) goes to stderr.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker; // src/checker/ - normalization, extraction, link checking
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - crawl settings
mod crawl; // src/crawl/ - per-seed sources, fan-in, pipeline
mod error; // src/error.rs - error types
mod transport; // src/transport.rs - shared HTTP capability

use anyhow::{bail, Context, Result};
use checker::{StatusRecord, FAILURE_STATUS};
use clap::Parser; // Parser trait enables the parse() method
use cli::Cli;
use crawl::{CrawlRun, Crawler, SeedOutcome};
use std::io::Write;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use transport::HttpTransport;

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = all seeds processed
//   Ok(1) = broken links found and --fail-on-broken was given
//   Err   = startup error (reported as exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let seeds = cli.all_seeds();
    if seeds.is_empty() {
        bail!("no URLs provided; pass one or more seed URLs (see --help)");
    }

    setup_tracing(cli.verbose);

    let config = cli.crawl_config();
    let transport = HttpTransport::new(config.timeout, &config.user_agent)
        .context("failed to create HTTP client")?;

    // Ctrl-C cancels every in-flight request; the pipeline then drains
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling outstanding requests");
            on_signal.cancel();
        }
    });

    let crawler = Crawler::new(Arc::new(transport), config, cancel);
    let run = crawler.run(&seeds);

    let records = report(run, cli.json).await?;

    let broken = records.iter().filter(|r| !r.is_ok()).count();
    let unreachable = records
        .iter()
        .filter(|r| r.status == FAILURE_STATUS && r.error.is_some())
        .count();
    info!(
        total = records.len(),
        ok = records.len() - broken,
        broken,
        unreachable,
        "summary"
    );

    if cli.fail_on_broken && broken > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Consumes the merged record channel
//
// Plain mode prints each record the moment it arrives. JSON mode has to wait
// for the whole crawl, then prints one array.
async fn report(run: CrawlRun, json: bool) -> Result<Vec<StatusRecord>> {
    let CrawlRun { mut records, seeds } = run;
    let stdout = std::io::stdout();
    let mut collected = Vec::new();

    while let Some(record) = records.recv().await {
        if !json {
            writeln!(stdout.lock(), "{}", record)?;
        }
        collected.push(record);
    }

    if json {
        let output = serde_json::to_string_pretty(&collected)?;
        writeln!(stdout.lock(), "{}", output)?;
    }

    // Seed failures were already logged by the pipeline as they happened
    let outcomes: Vec<SeedOutcome> = seeds.await.context("link sources did not finish")?;
    for outcome in &outcomes {
        if let Ok(summary) = &outcome.result {
            debug!(seed = %outcome.seed, pages = summary.pages, links = summary.links, "seed done");
        }
    }
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(seeds = outcomes.len(), failed, "all seeds processed");

    Ok(collected)
}

// Logs go to stderr with a fixed filter; no environment variables are read
fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("link_probe=debug,warn")
    } else {
        EnvFilter::new("link_probe=info,warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
