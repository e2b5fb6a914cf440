//! Command-line and environment configuration
//!
//! Every tunable can be given as a flag or through its environment
//! variable; a `.env` file in the working directory is loaded first.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::scrapers::tdlr;
use crate::traits::ScraperOptions;

#[derive(Debug, Parser)]
#[command(author, version, about = "Multi-source construction project scraper")]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// SQLite database file
    #[arg(long, global = true, env = "PROJECT_SCOUT_DB", default_value = "projects.db")]
    pub db_path: PathBuf,

    /// Pause between listing pages, in milliseconds
    #[arg(long, global = true, env = "PROJECT_SCOUT_PAGE_DELAY_MS", default_value_t = 500)]
    pub page_delay_ms: u64,

    /// Listing entries per page (sources cap this at their own maximum)
    #[arg(long, global = true, env = "PROJECT_SCOUT_PAGE_SIZE", default_value_t = 15)]
    pub page_size: usize,

    /// Maximum detail pages fetched at once per source
    #[arg(long, global = true, env = "PROJECT_SCOUT_CONCURRENCY", default_value_t = 10)]
    pub concurrency: usize,

    /// Timeout for every remote request, in seconds
    #[arg(long, global = true, env = "PROJECT_SCOUT_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl Settings {
    pub fn scraper_options(&self) -> ScraperOptions {
        ScraperOptions {
            page_size: self.page_size.max(1),
            page_delay: Duration::from_millis(self.page_delay_ms),
            concurrency: self.concurrency.max(1),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape projects into the local database
    Scrape {
        /// Source to scrape, or "all" for every registered source
        #[arg(long, default_value = tdlr::SOURCE_NAME)]
        source: String,

        /// Maximum projects to fetch per source
        #[arg(long, default_value_t = 100)]
        max_records: usize,
    },

    /// Search stored projects by number, name, facility, city or county
    Search {
        query: String,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Number of stored projects
    Count,

    /// List available sources
    ListSources,
}
