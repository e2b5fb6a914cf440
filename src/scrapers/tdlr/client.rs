use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, REFERER};
use tracing::debug;

use crate::error::FetchError;
use crate::models::{ListingPage, ListingRequest};
use crate::traits::{ScraperConfig, SourceClient};

/// HTTP transport for the TDLR TABS search API
#[derive(Clone)]
pub struct TdlrClient {
    client: Client,
    config: ScraperConfig,
}

impl TdlrClient {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            REFERER,
            HeaderValue::from_str(&config.base_url).context("Invalid referer URL")?,
        );

        let client = Client::builder()
            .user_agent(config.user_agent())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl SourceClient for TdlrClient {
    async fn fetch_listing(&self, request: &ListingRequest) -> Result<ListingPage, FetchError> {
        let response = self
            .client
            .post(&self.config.listing_url)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let page = response.json::<ListingPage>().await?;
        debug!(
            "Listing page {} returned {} rows",
            request.page_number,
            page.data.len()
        );
        Ok(page)
    }

    async fn fetch_detail(&self, identifier: &str) -> Result<String, FetchError> {
        let url = self.config.detail_url(identifier);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }
}
