//! Texas Department of Licensing and Regulation (TABS) project scraper
//!
//! Listing pages are fetched one at a time in page order with a pause
//! between them. The detail pages of each listing page are fetched
//! concurrently, never more than `concurrency` at once. A detail page that
//! times out, fails or does not parse drops that one project and nothing else.

mod client;
mod mapper;
mod parser;

use std::future::Future;

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use crate::error::FetchError;
use crate::models::{ListingEntry, ListingRequest, Project, ScrapeOutcome, SourceInfo};
use crate::traits::{ProjectScraper, ScraperConfig, ScraperOptions, SourceClient};

pub use client::TdlrClient;
use parser::TdlrParser;

pub const SOURCE_NAME: &str = "tdlr";

/// Default TDLR configuration with the runtime options applied
pub fn tdlr_config(options: &ScraperOptions) -> ScraperConfig {
    ScraperConfig {
        name: SOURCE_NAME.to_string(),
        base_url: "https://www.tdlr.texas.gov/TABS/search".to_string(),
        listing_url: "https://www.tdlr.texas.gov/TABS/Search/SearchProjects".to_string(),
        detail_url_pattern: "https://www.tdlr.texas.gov/TABS/Search/Project/{id}".to_string(),
        sort_column: "ProjectCreatedOn".to_string(),
        max_page_size: 15,
        page_size: options.page_size,
        page_delay: options.page_delay,
        concurrency: options.concurrency.max(1),
        timeout: options.timeout,
    }
}

/// Scraper for TDLR construction projects
pub struct TdlrScraper<C = TdlrClient> {
    client: C,
    config: ScraperConfig,
    parser: TdlrParser,
}

impl TdlrScraper<TdlrClient> {
    pub fn new(options: &ScraperOptions) -> Result<Self> {
        let config = tdlr_config(options);
        let client = TdlrClient::new(&config)?;
        Ok(Self::with_client(config, client))
    }
}

impl<C: SourceClient> TdlrScraper<C> {
    pub fn with_client(config: ScraperConfig, client: C) -> Self {
        Self {
            client,
            config,
            parser: TdlrParser,
        }
    }

    /// Fetch and parse the detail pages of one listing page
    async fn fetch_details(&self, entries: Vec<ListingEntry>) -> Vec<Project> {
        stream::iter(entries)
            .map(|entry| self.fetch_project(entry))
            .buffer_unordered(self.config.concurrency.max(1))
            .filter_map(|project| async move { project })
            .collect()
            .await
    }

    async fn fetch_project(&self, entry: ListingEntry) -> Option<Project> {
        let markup = match self.timed(self.client.fetch_detail(&entry.identifier)).await {
            Ok(markup) => markup,
            Err(e) => {
                warn!("Failed to fetch details for {}: {}", entry.identifier, e);
                return None;
            }
        };

        match self
            .parser
            .parse_project_details(&markup, &entry.identifier, &entry.fields)
        {
            Ok(project) => Some(project),
            Err(e) => {
                warn!("Skipping {}: {}", entry.identifier, e);
                None
            }
        }
    }

    /// Apply the configured timeout to a remote call
    async fn timed<T>(
        &self,
        call: impl Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        tokio::time::timeout(self.config.timeout, call)
            .await
            .unwrap_or(Err(FetchError::Timeout))
    }
}

#[async_trait]
impl<C: SourceClient> ProjectScraper for TdlrScraper<C> {
    fn describe_source(&self) -> SourceInfo {
        SourceInfo {
            name: "TDLR".to_string(),
            description: "Texas Department of Licensing and Regulation construction projects"
                .to_string(),
            url: self.config.base_url.clone(),
            fields_available: mapper::MAPPER
                .canonical_fields()
                .map(str::to_string)
                .collect(),
        }
    }

    async fn scrape_projects(&self, limit: usize) -> Result<ScrapeOutcome> {
        let mut outcome = ScrapeOutcome::default();
        let mut page_number = 1;
        let page_size = self.config.listing_page_size();

        info!("Starting {} scrape: limit={}", self.config.name, limit);

        while outcome.projects.len() < limit {
            let request = ListingRequest::new(page_number, page_size, &self.config.sort_column);

            info!("Fetching page {} ({} records)...", page_number, page_size);

            let page = match self.timed(self.client.fetch_listing(&request)).await {
                Ok(page) => page,
                Err(e) => {
                    error!(
                        "Listing page {} failed on {}: {}",
                        page_number, self.config.name, e
                    );
                    break;
                }
            };

            if page.data.is_empty() {
                info!("No more projects to fetch");
                break;
            }

            let listed = page.data.len();
            let mut entries = self.parser.parse_project_list(&page);
            entries.truncate(limit - outcome.projects.len());
            let requested = entries.len();

            info!("Fetching details for {} projects concurrently...", requested);
            let batch = self.fetch_details(entries).await;

            outcome.listed += requested;
            outcome.failed += requested - batch.len();
            info!(
                "Page {} complete: {}/{} projects parsed, total {} (source reports {})",
                page_number,
                batch.len(),
                requested,
                outcome.projects.len() + batch.len(),
                page.total_records
                    .map_or_else(|| "unknown".to_string(), |total| total.to_string())
            );
            outcome.projects.extend(batch);

            if listed < page_size {
                info!("Reached end of available data");
                break;
            }

            page_number += 1;
            if !self.config.page_delay.is_zero() && outcome.projects.len() < limit {
                tokio::time::sleep(self.config.page_delay).await;
            }
        }

        outcome.projects.truncate(limit);
        info!(
            "{} scraping complete! Total projects: {} ({} failed)",
            self.config.name,
            outcome.projects.len(),
            outcome.failed
        );
        Ok(outcome)
    }
}
