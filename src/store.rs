//! Per-query listing stores
//!
//! Each query persists its accepted listings in one CSV file under the data
//! directory. The file is append-only: the header row is written once at
//! creation and committed rows are never rewritten, so previously accepted
//! listings survive any later failure.

use crate::error::Result;
use crate::types::Listing;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Append-only CSV store for one query's accepted listings.
///
/// Cheap to clone; the store is just a path. All methods are synchronous
/// (the `csv` crate is blocking); async callers wrap them in
/// `tokio::task::spawn_blocking`.
#[derive(Clone, Debug)]
pub struct ListingStore {
    path: PathBuf,
}

impl ListingStore {
    /// Store for `name` under `data_dir`
    pub fn new(data_dir: impl AsRef<Path>, name: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(name),
        }
    }

    /// Path of the backing CSV file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the identity keys of every listing currently persisted.
    ///
    /// A missing store yields an empty set. Malformed rows are skipped with
    /// a warning rather than failing the caller, and an unreadable file is
    /// likewise degraded to an empty set: dedup then treats its contents as
    /// unknown and the run continues.
    pub fn existing_keys(&self) -> HashSet<String> {
        let mut keys = HashSet::new();
        if !self.path.exists() {
            return keys;
        }

        let mut reader = match csv::Reader::from_path(&self.path) {
            Ok(reader) => reader,
            Err(e) => {
                warn!(store = %self.path.display(), error = %e, "could not open store, treating as empty");
                return keys;
            }
        };

        for (row, record) in reader.deserialize::<Listing>().enumerate() {
            match record {
                Ok(listing) => {
                    keys.insert(listing.identity_key());
                }
                Err(e) => {
                    warn!(
                        store = %self.path.display(),
                        row = row + 1,
                        error = %e,
                        "skipping malformed row"
                    );
                }
            }
        }

        debug!(store = %self.path.display(), keys = keys.len(), "loaded existing keys");
        keys
    }

    /// Append listings to the store, creating it with the header row first
    /// when absent. Returns the number of rows committed.
    ///
    /// An empty commit is a valid no-op that still materializes the store
    /// (header only), so every configured query leaves a well-formed file
    /// behind.
    ///
    /// # Errors
    /// Returns an error when the file cannot be created or a row cannot be
    /// written; the caller reports it for this one query only.
    pub fn commit(&self, listings: &[Listing]) -> Result<usize> {
        let existed = self.path.exists();
        if !existed {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            // Writer::from_path emits the header row from the first
            // serialized record; for an empty first commit, write it by hand
            // so the schema is in place either way.
            let mut writer = csv::Writer::from_path(&self.path)?;
            writer.write_record(Listing::HEADER)?;
            writer.flush()?;
        }

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        for listing in listings {
            writer.serialize(listing)?;
        }
        writer.flush()?;

        debug!(store = %self.path.display(), committed = listings.len(), "committed listings");
        Ok(listings.len())
    }
}

impl Listing {
    /// CSV column header, fixed schema of every store file
    pub const HEADER: [&'static str; 8] = [
        "title",
        "organization",
        "location",
        "compensation",
        "description",
        "url",
        "posted_date",
        "organization_size",
    ];
}
