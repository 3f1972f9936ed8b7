mod cli;
mod render;
mod source;

use clap::Parser;
use cli::{Cli, Command};
use render::{render_json, render_outcome, render_sample_notice};
use sentiscope_core::{AppConfig, CoreError, ErrorExt, ErrorReporter, FetchResult};
use session_cache::RequestCache;
use source::Source;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "sentiscope=info,twitter_client=info,session_cache=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Starting sentiscope");

    let reporter = ErrorReporter::new();
    let config = AppConfig::load(cli.config.as_deref())
        .map_err(|e| report(&reporter, CoreError::from(e)))?;

    let sample = match &cli.command {
        Command::Search { source, .. } | Command::Interactive { source } => source.sample,
    };
    if !sample {
        if let Err(e) = config.require_bearer_token() {
            reporter.report_warning(&CoreError::from(e));
        }
    }

    match cli.command {
        Command::Search {
            keyword,
            source,
            json,
        } => {
            let count = source.count;
            let source =
                Source::from_config(&config, source.sample).map_err(|e| report(&reporter, e))?;
            let mut cache = RequestCache::new(source);

            let outcome = fetch_interruptible(&mut cache, &reporter, &keyword, count).await;
            if json {
                println!("{}", render_json(&outcome)?);
            } else {
                print_outcome(&cache, &keyword, &outcome);
            }
            log_metrics(&cache).await;
        }
        Command::Interactive { source } => {
            let count = source.count;
            let source =
                Source::from_config(&config, source.sample).map_err(|e| report(&reporter, e))?;
            let mut cache = RequestCache::new(source);
            run_session(&mut cache, &reporter, count).await?;
            log_metrics(&cache).await;
        }
    }

    Ok(())
}

fn report(reporter: &ErrorReporter, error: CoreError) -> anyhow::Error {
    reporter.report_error(&error);
    anyhow::anyhow!(error.user_friendly_message())
}

/// Run one cached fetch with Ctrl-C wired to its cancellation token.
async fn fetch_interruptible(
    cache: &mut RequestCache<Source>,
    reporter: &ErrorReporter,
    keyword: &str,
    count: u32,
) -> FetchResult {
    let cancel = CancellationToken::new();
    cache.source_mut().rearm(cancel.clone());

    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, cancelling fetch");
            cancel.cancel();
        }
    });

    let outcome = cache.get_or_fetch(keyword, count).await;
    watcher.abort();
    if let Err(e) = &outcome {
        reporter.report_warning(&CoreError::from(e.clone()));
    }
    outcome
}

async fn log_metrics(cache: &RequestCache<Source>) {
    if let Some(json) = cache.source().export_metrics().await {
        info!("Fetch metrics: {}", json);
    }
}

fn print_outcome(cache: &RequestCache<Source>, keyword: &str, outcome: &FetchResult) {
    if let Some(available) = cache.source().missing_keywords(keyword) {
        print!("{}", render_sample_notice(keyword, &available));
    }
    print!("{}", render_outcome(keyword, outcome));
}

async fn run_session(
    cache: &mut RequestCache<Source>,
    reporter: &ErrorReporter,
    count: u32,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Enter a keyword to analyze, or `quit` to exit.");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        let keyword = line.trim();
        if keyword.is_empty() {
            continue;
        }
        if keyword.eq_ignore_ascii_case("quit") || keyword.eq_ignore_ascii_case("exit") {
            break;
        }

        let outcome = fetch_interruptible(cache, reporter, keyword, count).await;
        print_outcome(cache, keyword, &outcome);
        println!();
    }

    info!("Session ended with {} cached results", cache.len());
    Ok(())
}
