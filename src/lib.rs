//! # jobscout
//!
//! Concurrent multi-source job search aggregator.
//!
//! jobscout runs a set of named search queries against multiple listing
//! sources in parallel, deduplicates results against per-query CSV stores,
//! and commits only the genuinely new listings. Runs are idempotent: a
//! second run over unchanged sources commits nothing and reports everything
//! as duplicates.
//!
//! ## Design
//!
//! - **Failure isolation** — one query's fetch or commit failure is reported
//!   in the run summary and never aborts sibling queries
//! - **Bounded fan-out** — at most `max_concurrent` queries run at once
//!   (default 3), keeping pressure on external sources bounded
//! - **Append-only stores** — per-query CSV files are created with a schema
//!   header and only ever appended to; committed listings are never rewritten
//! - **Event-driven** — consumers subscribe to run events, no polling
//!
//! ## Quick Start
//!
//! ```no_run
//! use jobscout::{Orchestrator, OrchestratorConfig, SearchConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let queries = SearchConfig::load("job_config.yaml")?.into_queries()?;
//!     let orchestrator = Orchestrator::new(OrchestratorConfig::default());
//!
//!     let summary = orchestrator.run(queries).await?;
//!     println!("{} new listings", summary.total_new);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types and YAML loading
pub mod config;
/// Error types
pub mod error;
/// Listing sources behind the `SourceFetcher` trait
pub mod fetcher;
/// The concurrent search-and-merge orchestrator
pub mod orchestrator;
/// Per-query append-only CSV stores
pub mod store;
/// Core types: listings, queries, results, summaries, events
pub mod types;

// Re-export commonly used types
pub use config::{OrchestratorConfig, QueryConfig, SearchConfig};
pub use error::{Error, Result};
pub use fetcher::{default_fetchers, DiceFetcher, RemotiveFetcher, SourceFetcher, WellfoundFetcher};
pub use orchestrator::Orchestrator;
pub use store::ListingStore;
pub use types::{Listing, Query, QueryReport, SearchEvent, SourceKind, Summary, TaskResult};
