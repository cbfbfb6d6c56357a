//! Wellfound (AngelList) catalog — startup listings

use super::{compensation_range, posted_today, SourceFetcher};
use crate::error::Result;
use crate::types::{Listing, SourceKind};
use async_trait::async_trait;
use tracing::info;

/// Fetcher for Wellfound listings
#[derive(Clone, Copy, Debug, Default)]
pub struct WellfoundFetcher;

#[async_trait]
impl SourceFetcher for WellfoundFetcher {
    fn kind(&self) -> SourceKind {
        SourceKind::Wellfound
    }

    async fn fetch(&self, role: &str, location: &str, remote: bool) -> Result<Vec<Listing>> {
        info!(role, location, "searching Wellfound");

        let catalog = [
            (
                role.to_string(),
                "InnovateStartup",
                (130_000, 160_000),
                format!("Join our growing team as a {role} and help build the next unicorn."),
                "10-50",
            ),
            (
                format!("Lead {role}"),
                "GrowthCo",
                (140_000, 180_000),
                format!("Lead {role} position with equity and great benefits in a fast-growing startup."),
                "50-100",
            ),
            (
                format!("Principal {role}"),
                "UnicornTech",
                (160_000, 200_000),
                format!("Principal {role} role architecting scalable solutions for millions of users."),
                "100-500",
            ),
        ];

        let listings: Vec<Listing> = catalog
            .into_iter()
            .enumerate()
            .map(|(i, (title, organization, (min, max), description, size))| Listing {
                title,
                organization: organization.to_string(),
                location: listing_location(location, remote),
                compensation: compensation_range(min, max),
                description,
                url: format!("https://wellfound.com/job/{}", 200_000 + i),
                posted_date: posted_today(),
                organization_size: size.to_string(),
            })
            .collect();

        info!(found = listings.len(), "Wellfound search complete");
        Ok(listings)
    }
}

fn listing_location(location: &str, remote: bool) -> String {
    if remote {
        if location.contains("APAC") || location.contains("EMEA") {
            // Carry the region text through, e.g. "Remote (APAC)" stays as is
            let region = location
                .split_once('(')
                .and_then(|(_, rest)| rest.split_once(')'))
                .map(|(region, _)| region)
                .unwrap_or("Global");
            format!("Remote ({region})")
        } else {
            "Remote (Global)".to_string()
        }
    } else if location.contains("Australia") {
        "Sydney".to_string()
    } else {
        "Singapore".to_string()
    }
}
