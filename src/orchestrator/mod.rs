//! Search orchestrator — fans queries out to source fetchers with bounded
//! parallelism and merges new listings into per-query stores.
//!
//! One task runs per query (fetch, dedup against the store, commit), at most
//! `max_concurrent` at a time. Task failures are isolated: a failed fetch or
//! commit produces a failed [`TaskResult`] for that query and never aborts
//! siblings. Results are collected in completion order into a [`Summary`],
//! and [`run`](Orchestrator::run) returns only after every task finished.
//!
//! Cancelling a run (dropping or timing out the `run` future) aborts
//! in-flight tasks; listings already committed to a store stand, since
//! commits are append-only.

use crate::config::OrchestratorConfig;
use crate::error::{Error, Result};
use crate::fetcher::{default_fetchers, SourceFetcher};
use crate::store::ListingStore;
use crate::types::{Query, SearchEvent, SourceKind, Summary, TaskResult};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{broadcast, Semaphore};
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Runs a set of configured queries concurrently and aggregates the outcome.
pub struct Orchestrator {
    config: OrchestratorConfig,
    fetchers: HashMap<SourceKind, Arc<dyn SourceFetcher>>,
    event_tx: broadcast::Sender<SearchEvent>,
}

impl Orchestrator {
    /// Orchestrator with the bundled source fetchers
    pub fn new(config: OrchestratorConfig) -> Self {
        Self::with_fetchers(config, default_fetchers())
    }

    /// Orchestrator with a custom fetcher registry.
    ///
    /// Primarily a test seam, but also how a deployment plugs in real
    /// HTTP-backed fetchers.
    pub fn with_fetchers(
        config: OrchestratorConfig,
        fetchers: HashMap<SourceKind, Arc<dyn SourceFetcher>>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            fetchers,
            event_tx,
        }
    }

    /// Subscribe to [`SearchEvent`]s emitted while a run is in progress
    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.event_tx.subscribe()
    }

    /// Run every query to completion and return the aggregate summary.
    ///
    /// Duplicate query names are a configuration error surfaced before any
    /// task is dispatched. Everything after dispatch is isolated per query:
    /// fetch errors, commit errors, and even panicking fetchers produce a
    /// failed entry in the summary without affecting sibling queries.
    pub async fn run(&self, queries: Vec<Query>) -> Result<Summary> {
        let mut names = HashSet::new();
        for query in &queries {
            if !names.insert(query.name.clone()) {
                return Err(Error::config_key(
                    format!("duplicate query name '{}'", query.name),
                    query.name.clone(),
                ));
            }
        }

        info!(
            queries = queries.len(),
            workers = self.config.max_concurrent,
            "starting search run"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent.max(1)));
        let mut tasks = JoinSet::new();
        let mut task_names: HashMap<tokio::task::Id, String> = HashMap::new();

        for query in queries {
            let fetcher = self.fetchers.get(&query.source).cloned();
            let store = ListingStore::new(&self.config.data_dir, &query.name);
            let semaphore = Arc::clone(&semaphore);
            let event_tx = self.event_tx.clone();
            let name = query.name.clone();

            let handle = tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return TaskResult::failed(query.name, "worker pool closed"),
                };
                run_query_task(query, fetcher, store, event_tx).await
            });
            task_names.insert(handle.id(), name);
        }

        // Single collector: results fold into the summary in completion
        // order, behind no lock since only this loop touches it.
        let mut summary = Summary::default();
        while let Some(joined) = tasks.join_next_with_id().await {
            let result = match joined {
                Ok((_, result)) => result,
                Err(e) => {
                    let name = task_names
                        .get(&e.id())
                        .cloned()
                        .unwrap_or_else(|| "<unknown>".to_string());
                    warn!(query = %name, error = %e, "query task aborted");
                    let message = format!("task aborted: {e}");
                    let _ = self.event_tx.send(SearchEvent::QueryFailed {
                        query: name.clone(),
                        error: message.clone(),
                    });
                    TaskResult::failed(name, message)
                }
            };
            summary.record(result);
        }

        let _ = self.event_tx.send(SearchEvent::RunCompleted {
            total_new: summary.total_new,
            total_duplicates: summary.total_duplicates,
        });
        info!(
            total_queries = summary.total_queries,
            successful = summary.successful_queries,
            new = summary.total_new,
            duplicates = summary.total_duplicates,
            "search run complete"
        );

        Ok(summary)
    }
}

/// Run one query's pipeline, converting any error into a failed result
async fn run_query_task(
    query: Query,
    fetcher: Option<Arc<dyn SourceFetcher>>,
    store: ListingStore,
    event_tx: broadcast::Sender<SearchEvent>,
) -> TaskResult {
    let name = query.name.clone();
    let _ = event_tx.send(SearchEvent::QueryStarted {
        query: name.clone(),
        source: query.source,
    });

    match execute_query(query, fetcher, store).await {
        Ok((new, duplicates)) => {
            let _ = event_tx.send(SearchEvent::QueryCompleted {
                query: name.clone(),
                new,
                duplicates,
            });
            TaskResult::ok(name, new, duplicates)
        }
        Err(e) => {
            warn!(query = %name, error = %e, "query failed");
            let _ = event_tx.send(SearchEvent::QueryFailed {
                query: name.clone(),
                error: e.to_string(),
            });
            TaskResult::failed(name, e.to_string())
        }
    }
}

/// The fetch → dedup → commit pipeline for one query.
///
/// Existing keys are read before the fetch, so dedup reflects the store's
/// state at the start of this run. Within the batch, accepted keys join the
/// set immediately so repeats inside one fetch are suppressed too, and
/// accepted listings keep fetch order.
async fn execute_query(
    query: Query,
    fetcher: Option<Arc<dyn SourceFetcher>>,
    store: ListingStore,
) -> Result<(usize, usize)> {
    let fetcher = fetcher.ok_or_else(|| {
        Error::config_key(
            format!("no fetcher registered for source '{}'", query.source),
            query.name.clone(),
        )
    })?;

    info!(
        query = %query.name,
        role = %query.role,
        location = %query.location,
        remote = query.remote,
        "processing query"
    );

    let keys_store = store.clone();
    let mut seen = tokio::task::spawn_blocking(move || keys_store.existing_keys())
        .await
        .map_err(|e| Error::Task(e.to_string()))?;

    let fetched = fetcher
        .fetch(&query.role, &query.location, query.remote)
        .await?;
    let total = fetched.len();

    let mut accepted = Vec::new();
    let mut duplicates = 0;
    for listing in fetched {
        if seen.insert(listing.identity_key()) {
            accepted.push(listing);
        } else {
            duplicates += 1;
        }
    }

    let commit_store = store.clone();
    let committed = tokio::task::spawn_blocking(move || commit_store.commit(&accepted))
        .await
        .map_err(|e| Error::Task(e.to_string()))??;

    info!(
        query = %query.name,
        total,
        new = committed,
        duplicates,
        "query complete"
    );
    Ok((committed, duplicates))
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
