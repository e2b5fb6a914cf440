//! Traits and configuration shared by every scraping source

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::{ListingPage, ListingRequest, ScrapeOutcome, SourceInfo};

/// Runtime tunables handed to every scraper constructor
#[derive(Debug, Clone)]
pub struct ScraperOptions {
    /// Listing entries requested per page, clamped to the source maximum
    pub page_size: usize,
    /// Pause between listing pages
    pub page_delay: Duration,
    /// Ceiling on simultaneously in-flight detail fetches
    pub concurrency: usize,
    /// Timeout applied to every remote call
    pub timeout: Duration,
}

impl Default for ScraperOptions {
    fn default() -> Self {
        Self {
            page_size: 15,
            page_delay: Duration::from_millis(500),
            concurrency: 10,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Configuration for one remote source
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Registry name of the source
    pub name: String,
    /// Public search page, also sent as the referer
    pub base_url: String,
    /// Paginated listing endpoint (JSON POST)
    pub listing_url: String,
    /// Detail page URL with an `{id}` placeholder
    pub detail_url_pattern: String,
    /// Column the listing is sorted by
    pub sort_column: String,
    /// Largest page the listing endpoint accepts
    pub max_page_size: usize,
    pub page_size: usize,
    pub page_delay: Duration,
    pub concurrency: usize,
    pub timeout: Duration,
}

impl ScraperConfig {
    /// Detail page URL for one record identifier
    pub fn detail_url(&self, identifier: &str) -> String {
        let encoded = urlencoding::encode(identifier);
        self.detail_url_pattern.replace("{id}", &encoded)
    }

    /// Page size sent with every listing request.
    ///
    /// It stays the same for the whole scrape: the remote side pages by
    /// offset, so shrinking the last page would shift it onto records an
    /// earlier page already returned.
    pub fn listing_page_size(&self) -> usize {
        self.page_size.min(self.max_page_size).max(1)
    }

    pub fn user_agent(&self) -> &'static str {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
    }
}

/// Trait for source-specific project scrapers
#[async_trait]
pub trait ProjectScraper: Send + Sync {
    /// Get the metadata describing this source
    ///
    /// # Returns
    /// * `SourceInfo` - Display name, description, portal URL and the
    ///   canonical fields this source can fill
    fn describe_source(&self) -> SourceInfo;

    /// Scrape up to `limit` projects from this source
    ///
    /// Failures of individual pages or records are logged and counted;
    /// only setup problems are returned as errors.
    ///
    /// # Arguments
    /// * `limit` - The maximum number of projects to return
    ///
    /// # Returns
    /// * `Result<ScrapeOutcome>` - Parsed projects plus listed and failed counts
    async fn scrape_projects(&self, limit: usize) -> Result<ScrapeOutcome>;
}

/// Transport for a paginated listing endpoint and its detail pages
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Fetch one page of listing results
    ///
    /// # Arguments
    /// * `request` - Page number, page size, sort order and filters
    ///
    /// # Returns
    /// * `Result<ListingPage, FetchError>` - The listing rows, or the reason
    ///   the request failed
    async fn fetch_listing(&self, request: &ListingRequest) -> Result<ListingPage, FetchError>;

    /// Fetch the detail page of one record
    ///
    /// # Arguments
    /// * `identifier` - The record identifier taken from the listing
    ///
    /// # Returns
    /// * `Result<String, FetchError>` - Raw markup of the detail page
    async fn fetch_detail(&self, identifier: &str) -> Result<String, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ScraperConfig {
        ScraperConfig {
            name: "test".to_string(),
            base_url: "https://example.test/search".to_string(),
            listing_url: "https://example.test/api/search".to_string(),
            detail_url_pattern: "https://example.test/project/{id}".to_string(),
            sort_column: "CreatedOn".to_string(),
            max_page_size: 15,
            page_size: 40,
            page_delay: Duration::ZERO,
            concurrency: 10,
            timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn detail_url_encodes_identifier() {
        assert_eq!(
            config().detail_url("TABS 2026/01"),
            "https://example.test/project/TABS%202026%2F01"
        );
    }

    #[test]
    fn page_size_is_bounded_by_source_maximum() {
        let mut config = config();
        assert_eq!(config.listing_page_size(), 15);

        config.page_size = 7;
        assert_eq!(config.listing_page_size(), 7);

        config.page_size = 0;
        assert_eq!(config.listing_page_size(), 1);
    }
}
