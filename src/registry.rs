//! Name-keyed lookup of scraper constructors

use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use crate::error::RegistryError;
use crate::scrapers::{TdlrScraper, tdlr};
use crate::traits::{ProjectScraper, ScraperOptions};

pub type ScraperFactory =
    Arc<dyn Fn(&ScraperOptions) -> Result<Box<dyn ProjectScraper>> + Send + Sync>;

/// Registered sources in registration order.
///
/// Adding a source means registering a constructor here; the manager and
/// storage never change.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<(String, ScraperFactory)>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every source this build ships with
    pub fn with_builtin_sources() -> Self {
        let mut registry = Self::new();
        registry.register(tdlr::SOURCE_NAME, |options| {
            Ok(Box::new(TdlrScraper::new(options)?))
        });
        registry
    }

    /// Register `factory` under `name`, replacing any earlier registration
    /// while keeping its position.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&ScraperOptions) -> Result<Box<dyn ProjectScraper>> + Send + Sync + 'static,
    {
        let name = name.into();
        let factory: ScraperFactory = Arc::new(factory);

        match self.sources.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = factory,
            None => self.sources.push((name, factory)),
        }
    }

    /// Construct the scraper registered under `name`
    pub fn resolve(
        &self,
        name: &str,
        options: &ScraperOptions,
    ) -> Result<Box<dyn ProjectScraper>, RegistryError> {
        let (_, factory) = self
            .sources
            .iter()
            .find(|(existing, _)| existing == name)
            .ok_or_else(|| RegistryError::UnknownSource {
                name: name.to_string(),
                available: self.list(),
            })?;

        factory(options).map_err(|source| RegistryError::Setup {
            name: name.to_string(),
            source: source.into(),
        })
    }

    pub fn list(&self) -> Vec<String> {
        self.sources.iter().map(|(name, _)| name.clone()).collect()
    }
}

impl fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("sources", &self.list())
            .finish()
    }
}
