//! jobscout CLI — load the query configuration, run one search pass, and
//! print the aggregate report.
//!
//! The process exits non-zero only when the run cannot start (unreadable or
//! invalid configuration, no queries configured). Individual query failures
//! are reported in the summary with exit code 0.

use clap::Parser;
use jobscout::{Orchestrator, OrchestratorConfig, SearchConfig, SearchEvent, Summary};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "jobscout", version, about = "Multi-source job search aggregator")]
struct Args {
    /// Path to the query configuration file
    #[arg(short, long, default_value = "job_config.yaml")]
    config: PathBuf,

    /// Directory holding the per-query CSV stores
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Maximum queries running at once
    #[arg(short, long, default_value_t = 3)]
    workers: usize,

    /// Print the summary as JSON instead of the text report
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let queries = match SearchConfig::load(&args.config).and_then(SearchConfig::into_queries) {
        Ok(queries) => queries,
        Err(e) => {
            error!(config = %args.config.display(), error = %e, "could not load configuration");
            return ExitCode::FAILURE;
        }
    };
    if queries.is_empty() {
        error!(config = %args.config.display(), "no queries configured");
        return ExitCode::FAILURE;
    }

    let orchestrator = Orchestrator::new(OrchestratorConfig {
        data_dir: args.data_dir,
        max_concurrent: args.workers,
    });

    // Log per-query progress as tasks complete
    let mut events = orchestrator.subscribe();
    let progress = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                SearchEvent::QueryCompleted {
                    query,
                    new,
                    duplicates,
                } => info!(query = %query, new, duplicates, "query finished"),
                SearchEvent::QueryFailed { query, error } => {
                    warn!(query = %query, error = %error, "query failed")
                }
                SearchEvent::RunCompleted { .. } => break,
                SearchEvent::QueryStarted { .. } => {}
            }
        }
    });

    let summary = tokio::select! {
        result = orchestrator.run(queries) => match result {
            Ok(summary) => summary,
            Err(e) => {
                error!(error = %e, "search run could not start");
                return ExitCode::FAILURE;
            }
        },
        _ = tokio::signal::ctrl_c() => {
            // In-flight tasks are abandoned; committed listings stand
            warn!("interrupted, abandoning in-flight queries");
            return ExitCode::FAILURE;
        }
    };
    progress.abort();

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!(error = %e, "could not serialize summary");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_report(&summary);
    }

    ExitCode::SUCCESS
}

fn print_report(summary: &Summary) {
    println!();
    println!("{}", "=".repeat(60));
    println!("JOB SEARCH SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Total Queries Processed: {}", summary.total_queries);
    println!("Successful Queries:      {}", summary.successful_queries);
    println!("Total New Listings:      {}", summary.total_new);
    println!("Total Duplicates:        {}", summary.total_duplicates);
    println!();
    println!("Per-Query Results:");
    println!("{}", "-".repeat(40));
    for (name, report) in &summary.per_query {
        match &report.error {
            Some(error) => println!("{name}: FAILED ({error})"),
            None => println!(
                "{name}: {} new, {} duplicates",
                report.new, report.duplicates
            ),
        }
    }
}
