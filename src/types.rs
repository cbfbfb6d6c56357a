//! Core types for jobscout

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single job listing fetched from a source.
///
/// Listings are immutable once constructed. Field order matches the CSV
/// store column order, so rows (de)serialize positionally via serde.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Job title
    pub title: String,
    /// Hiring organization
    pub organization: String,
    /// Location text (city or remote-region description)
    pub location: String,
    /// Compensation range, free text (e.g. "$120,000 - $150,000")
    pub compensation: String,
    /// Short role description
    pub description: String,
    /// Reference URL for the listing
    pub url: String,
    /// Date the listing was posted (YYYY-MM-DD)
    pub posted_date: String,
    /// Organization headcount band (e.g. "100-500")
    pub organization_size: String,
}

impl Listing {
    /// Identity key used for duplicate detection across runs and within a
    /// fetch batch: normalized organization and title joined with `_`.
    ///
    /// Two listings with the same key are the same listing regardless of any
    /// other field differences.
    pub fn identity_key(&self) -> String {
        format!(
            "{}_{}",
            self.organization.trim().to_lowercase(),
            self.title.trim().to_lowercase()
        )
    }
}

/// Supported listing sources.
///
/// Configured source strings are matched case-insensitively by substring
/// (the original configs carry full URLs like
/// `https://remotive.io/remote-jobs`), but unknown strings are rejected at
/// configuration time rather than silently fetching nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Remotive — remote-first listings
    Remotive,
    /// Wellfound (AngelList) — startup listings
    Wellfound,
    /// Dice — enterprise listings
    Dice,
}

impl SourceKind {
    /// Match a configured source identifier (or URL) against the known
    /// sources. Returns `None` for unrecognized identifiers; the caller
    /// decides whether that is a configuration error.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let lower = identifier.to_lowercase();
        if lower.contains("remotive") {
            Some(Self::Remotive)
        } else if lower.contains("wellfound") {
            Some(Self::Wellfound)
        } else if lower.contains("dice") {
            Some(Self::Dice)
        } else {
            None
        }
    }

    /// Short lowercase name used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Remotive => "remotive",
            Self::Wellfound => "wellfound",
            Self::Dice => "dice",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One configured unit of search work, built from configuration and
/// immutable for the duration of a run.
#[derive(Clone, Debug)]
pub struct Query {
    /// Unique name; also the store filename (always `.csv`-suffixed)
    pub name: String,
    /// Role / search term
    pub role: String,
    /// Location filter
    pub location: String,
    /// Whether to search remote positions
    pub remote: bool,
    /// Seniority level (carried from configuration, informational)
    pub level: String,
    /// Which source to fetch from
    pub source: SourceKind,
}

/// Outcome of running one query's fetch-dedup-commit pipeline once
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskResult {
    /// Name of the query this result belongs to
    pub query: String,
    /// Listings committed this run
    pub new: usize,
    /// Listings discarded as duplicates this run
    pub duplicates: usize,
    /// Error message when the task failed; counts are 0 in that case
    pub error: Option<String>,
}

impl TaskResult {
    /// Successful result with the given counts
    pub fn ok(query: impl Into<String>, new: usize, duplicates: usize) -> Self {
        Self {
            query: query.into(),
            new,
            duplicates,
            error: None,
        }
    }

    /// Failed result carrying the error message
    pub fn failed(query: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            new: 0,
            duplicates: 0,
            error: Some(error.into()),
        }
    }
}

/// Per-query breakdown entry in a [`Summary`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryReport {
    /// Listings committed this run
    pub new: usize,
    /// Listings discarded as duplicates this run
    pub duplicates: usize,
    /// Error message when the query failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate report over all query tasks for one orchestrator run.
///
/// Built incrementally as results arrive (completion order), finalized when
/// every dispatched task has completed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Queries dispatched, including failed ones
    pub total_queries: usize,
    /// Queries that completed without error
    pub successful_queries: usize,
    /// Total listings committed across all queries
    pub total_new: usize,
    /// Total duplicates discarded across all queries
    pub total_duplicates: usize,
    /// Per-query breakdown, keyed by query name
    pub per_query: BTreeMap<String, QueryReport>,
}

impl Summary {
    /// Fold one task result into the running totals.
    ///
    /// Failed results count toward `total_queries` and occupy their
    /// `per_query` slot but do not contribute to the other totals.
    pub fn record(&mut self, result: TaskResult) {
        self.total_queries += 1;
        if result.error.is_none() {
            self.successful_queries += 1;
            self.total_new += result.new;
            self.total_duplicates += result.duplicates;
        }
        self.per_query.insert(
            result.query,
            QueryReport {
                new: result.new,
                duplicates: result.duplicates,
                error: result.error,
            },
        );
    }
}

/// Event emitted during a search run.
///
/// The orchestrator broadcasts these as tasks progress; consumers subscribe
/// via [`Orchestrator::subscribe`](crate::orchestrator::Orchestrator::subscribe).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchEvent {
    /// A query task started fetching
    QueryStarted {
        /// Query name
        query: String,
        /// Source being fetched
        source: SourceKind,
    },

    /// A query task finished successfully
    QueryCompleted {
        /// Query name
        query: String,
        /// Listings committed
        new: usize,
        /// Duplicates discarded
        duplicates: usize,
    },

    /// A query task failed; siblings are unaffected
    QueryFailed {
        /// Query name
        query: String,
        /// Error message
        error: String,
    },

    /// All tasks completed and the summary is final
    RunCompleted {
        /// Total listings committed this run
        total_new: usize,
        /// Total duplicates discarded this run
        total_duplicates: usize,
    },
}
