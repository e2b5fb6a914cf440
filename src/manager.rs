use anyhow::Result;
use futures::future::join_all;
use serde::Serialize;
use tracing::{error, info};

use crate::database::{Database, SaveSummary};
use crate::models::{Project, ScrapeOutcome, SourceInfo};
use crate::registry::SourceRegistry;
use crate::traits::ScraperOptions;

/// Outcome of scraping one source
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScrapeReport {
    pub source: String,
    /// Listing entries whose detail pages were requested
    pub attempted: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub skipped: usize,
    /// Detail pages that timed out, errored or did not parse
    pub failed: usize,
    /// Set when the source failed as a whole
    pub error: Option<String>,
}

impl ScrapeReport {
    fn completed(source: &str, outcome: &ScrapeOutcome, summary: SaveSummary) -> Self {
        Self {
            source: source.to_string(),
            attempted: outcome.listed,
            inserted: summary.inserted,
            duplicates: summary.duplicates,
            skipped: summary.skipped,
            failed: outcome.failed,
            error: None,
        }
    }

    fn failed(source: &str, error: &anyhow::Error) -> Self {
        Self {
            source: source.to_string(),
            error: Some(format!("{error:#}")),
            ..Self::default()
        }
    }
}

/// Entry point for scraping and querying stored projects
#[derive(Clone)]
pub struct ScraperManager {
    registry: SourceRegistry,
    database: Database,
    options: ScraperOptions,
}

impl ScraperManager {
    pub fn new(registry: SourceRegistry, database: Database, options: ScraperOptions) -> Self {
        Self {
            registry,
            database,
            options,
        }
    }

    /// Scrape up to `limit` projects from one source and store the new ones.
    ///
    /// Unknown sources and constructor failures are returned as errors;
    /// per-project failures were already absorbed by the scraper.
    ///
    /// # Arguments
    /// * `source_name` - Registry name of the source
    /// * `limit` - The maximum number of projects to scrape
    ///
    /// # Returns
    /// * `Result<ScrapeReport>` - Attempted, stored, duplicate, skipped and failed counts
    pub async fn scrape_source(&self, source_name: &str, limit: usize) -> Result<ScrapeReport> {
        info!("Scraping {} projects from {}", limit, source_name);

        let scraper = self.registry.resolve(source_name, &self.options)?;
        let outcome = scraper.scrape_projects(limit).await?;
        let summary = self.database.save_many(&outcome.projects).await?;

        info!(
            "Saved {} projects from {} ({} duplicates, {} skipped, {} failed)",
            summary.inserted, source_name, summary.duplicates, summary.skipped, outcome.failed
        );

        Ok(ScrapeReport::completed(source_name, &outcome, summary))
    }

    /// Scrape every registered source concurrently.
    ///
    /// A failing source yields a zero-count report carrying its error and
    /// does not affect the others.
    ///
    /// # Returns
    /// * `Vec<ScrapeReport>` - One report per source, in registration order
    pub async fn scrape_all(&self, limit_per_source: usize) -> Vec<ScrapeReport> {
        let sources = self.registry.list();
        info!("Scraping from {} sources: {:?}", sources.len(), sources);

        let results = join_all(
            sources
                .iter()
                .map(|source| self.scrape_source(source, limit_per_source)),
        )
        .await;

        sources
            .iter()
            .zip(results)
            .map(|(source, result)| {
                result.unwrap_or_else(|e| {
                    error!("Error scraping {}: {:#}", source, e);
                    ScrapeReport::failed(source, &e)
                })
            })
            .collect()
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Project>> {
        self.database.search(query).await
    }

    pub async fn count(&self) -> Result<i64> {
        self.database.count().await
    }

    pub fn list_sources(&self) -> Vec<String> {
        self.registry.list()
    }

    /// Metadata for one registered source
    pub fn describe_source(&self, source_name: &str) -> Result<SourceInfo> {
        let scraper = self.registry.resolve(source_name, &self.options)?;
        Ok(scraper.describe_source())
    }
}
