//! Dice catalog — enterprise listings

use super::{compensation_range, posted_today, SourceFetcher};
use crate::error::Result;
use crate::types::{Listing, SourceKind};
use async_trait::async_trait;
use tracing::info;

/// Fetcher for Dice listings
#[derive(Clone, Copy, Debug, Default)]
pub struct DiceFetcher;

#[async_trait]
impl SourceFetcher for DiceFetcher {
    fn kind(&self) -> SourceKind {
        SourceKind::Dice
    }

    async fn fetch(&self, role: &str, location: &str, remote: bool) -> Result<Vec<Listing>> {
        info!(role, location, "searching Dice");

        let catalog = [
            (
                role.to_string(),
                "TechSolutions Inc",
                (125_000, 155_000),
                format!("Experienced {role} needed for enterprise software development with Fortune 500 clients."),
                "500-1000",
            ),
            (
                format!("Senior {role}"),
                "DataDriven Corp",
                (135_000, 170_000),
                format!("Senior {role} role with focus on data-driven applications and ML integration."),
                "200-500",
            ),
            (
                format!("Staff {role}"),
                "EnterpriseTech",
                (150_000, 190_000),
                format!("Staff {role} position leading technical architecture for enterprise solutions."),
                "1000+",
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
                url: format!("https://dice.com/job/{}", 300_000 + i),
                posted_date: posted_today(),
                organization_size: size.to_string(),
            })
            .collect();

        info!(found = listings.len(), "Dice search complete");
        Ok(listings)
    }
}

fn listing_location(location: &str, remote: bool) -> String {
    if remote {
        if location.contains("APAC") {
            "Remote (APAC-friendly hours)".to_string()
        } else if location.contains("EMEA") {
            "Remote (EMEA-friendly hours)".to_string()
        } else {
            "Remote (Flexible timezone)".to_string()
        }
    } else if location.contains("Australia") {
        "Perth".to_string()
    } else {
        "Singapore".to_string()
    }
}
