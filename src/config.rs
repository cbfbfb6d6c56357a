//! Configuration types for jobscout
//!
//! The on-disk format is a YAML mapping from query name to its settings:
//!
//! ```yaml
//! backend.csv:
//!   role: Backend Engineer
//!   location: Australia
//!   remote: false
//!   level: senior
//!   source: https://remotive.io/remote-jobs
//! ```
//!
//! Names without a `.csv` suffix gain one, so the query name doubles as the
//! store filename.

use crate::error::{Error, Result};
use crate::types::{Query, SourceKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

fn default_level() -> String {
    "senior".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_concurrent() -> usize {
    3
}

/// Settings for one configured query
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Role / search term
    pub role: String,

    /// Location filter
    pub location: String,

    /// Whether to search remote positions
    pub remote: bool,

    /// Seniority level (default: "senior")
    #[serde(default = "default_level")]
    pub level: String,

    /// Source identifier or URL-like string (e.g. "https://remotive.io/...").
    /// Legacy configs call this field `website`.
    #[serde(alias = "website")]
    pub source: String,
}

/// Full search configuration: all queries keyed by name
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchConfig {
    /// Query settings keyed by query name
    pub queries: BTreeMap<String, QueryConfig>,
}

impl SearchConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    /// Returns [`Error::Io`] when the file cannot be read and
    /// [`Error::Yaml`] when it is not a valid query mapping.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let queries: BTreeMap<String, QueryConfig> = serde_yaml::from_str(&content)?;
        Ok(Self { queries })
    }

    /// Validate the configuration and build one [`Query`] per entry.
    ///
    /// Source identifiers are resolved to [`SourceKind`] here; an unmatched
    /// identifier is a configuration error naming the offending query, not a
    /// silently empty search. Store filenames are normalized with a `.csv`
    /// suffix, and two names that normalize to the same filename are
    /// rejected.
    pub fn into_queries(self) -> Result<Vec<Query>> {
        let mut queries = Vec::with_capacity(self.queries.len());
        let mut seen_names: BTreeMap<String, String> = BTreeMap::new();

        for (name, config) in self.queries {
            let source = SourceKind::from_identifier(&config.source).ok_or_else(|| {
                Error::config_key(
                    format!("unknown source identifier '{}'", config.source),
                    name.clone(),
                )
            })?;

            let store_name = normalize_store_name(&name);
            if let Some(previous) = seen_names.insert(store_name.clone(), name.clone()) {
                return Err(Error::config_key(
                    format!(
                        "queries '{}' and '{}' resolve to the same store '{}'",
                        previous, name, store_name
                    ),
                    name,
                ));
            }

            queries.push(Query {
                name: store_name,
                role: config.role,
                location: config.location,
                remote: config.remote,
                level: config.level,
                source,
            });
        }

        Ok(queries)
    }
}

/// Orchestrator behavior settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Directory holding the per-query CSV stores (default: ".")
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Maximum query tasks running at once (default: 3).
    ///
    /// Bounds pressure on external sources; a tunable, not an architectural
    /// constant.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

/// Append `.csv` to a query name unless it already ends with it
fn normalize_store_name(name: &str) -> String {
    if name.ends_with(".csv") {
        name.to_string()
    } else {
        format!("{name}.csv")
    }
}
