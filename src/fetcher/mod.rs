//! Listing sources behind the [`SourceFetcher`] seam
//!
//! Each supported source implements [`SourceFetcher`]; the orchestrator
//! treats them as opaque capabilities with no shared state. The bundled
//! implementations are deterministic catalogs (three listings per source,
//! shaped by the role and location being searched); a deployment talking to
//! real job boards would put HTTP clients behind the same trait.

use crate::error::Result;
use crate::types::{Listing, SourceKind};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

mod dice;
mod remotive;
mod wellfound;

pub use dice::DiceFetcher;
pub use remotive::RemotiveFetcher;
pub use wellfound::WellfoundFetcher;

/// A listing source: given a search, return its current listings.
///
/// Implementations must be infallible in the cheap cases and return an error
/// otherwise; the query task catches the error and reports it for that one
/// query without affecting siblings.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Which source this fetcher serves
    fn kind(&self) -> SourceKind;

    /// Fetch listings for a role/location search
    async fn fetch(&self, role: &str, location: &str, remote: bool) -> Result<Vec<Listing>>;
}

/// Registry of the bundled fetchers, one per [`SourceKind`]
pub fn default_fetchers() -> HashMap<SourceKind, Arc<dyn SourceFetcher>> {
    let fetchers: Vec<Arc<dyn SourceFetcher>> = vec![
        Arc::new(RemotiveFetcher),
        Arc::new(WellfoundFetcher),
        Arc::new(DiceFetcher),
    ];
    fetchers.into_iter().map(|f| (f.kind(), f)).collect()
}

/// Today's date in the store's YYYY-MM-DD format
pub(crate) fn posted_today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// Render a salary band like `$120,000 - $150,000`
pub(crate) fn compensation_range(min: u32, max: u32) -> String {
    format!("${} - ${}", thousands(min), thousands(max))
}

fn thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
