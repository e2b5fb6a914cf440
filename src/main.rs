use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod database;
mod error;
mod manager;
mod mapper;
mod models;
mod parser;
mod registry;
mod scrapers;
#[cfg(test)]
mod testing;
mod traits;

use config::{Cli, Command};
use database::Database;
use manager::{ScrapeReport, ScraperManager};
use models::Project;
use registry::SourceRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let registry = SourceRegistry::with_builtin_sources();

    match &cli.command {
        Command::Scrape {
            source,
            max_records,
        } => {
            let manager = open_manager(registry, &cli).await?;
            let reports = if source == "all" {
                info!("Scraping from all sources");
                manager.scrape_all(*max_records).await
            } else {
                vec![manager.scrape_source(source, *max_records).await?]
            };

            println!("\n📊 Scraping Results:");
            for report in &reports {
                println!("{}", format_report(report));
            }
        }
        Command::Search { query, json } => {
            let manager = open_manager(registry, &cli).await?;
            let projects = manager.search(query).await?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&projects)?);
            } else {
                println!("\n🔍 Found {} matching projects:\n", projects.len());
                for project in &projects {
                    println!("{}\n", format_project(project));
                }
            }
        }
        Command::Count => {
            let manager = open_manager(registry, &cli).await?;
            println!("{} projects stored", manager.count().await?);
        }
        Command::ListSources => {
            let manager = open_manager(registry, &cli).await?;
            list_sources(&manager)?;
        }
    }

    Ok(())
}

async fn open_manager(registry: SourceRegistry, cli: &Cli) -> Result<ScraperManager> {
    let database = Database::open(&cli.settings.db_path).await?;
    Ok(ScraperManager::new(
        registry,
        database,
        cli.settings.scraper_options(),
    ))
}

fn list_sources(manager: &ScraperManager) -> Result<()> {
    let sources = manager.list_sources();

    println!("\n📚 Available Sources ({}):", sources.len());
    for name in &sources {
        let info = manager.describe_source(name)?;
        println!(
            "  {} [{}]: {} ({}, {} fields)",
            name,
            info.name,
            info.description,
            info.url,
            info.fields_available.len()
        );
    }

    Ok(())
}

fn format_report(report: &ScrapeReport) -> String {
    match &report.error {
        Some(error) => format!("  {}: failed - {}", report.source, error),
        None => format!(
            "  {}: {} attempted, {} new, {} duplicates, {} skipped, {} failed",
            report.source,
            report.attempted,
            report.inserted,
            report.duplicates,
            report.skipped,
            report.failed
        ),
    }
}

fn format_project(project: &Project) -> String {
    let text = |value: &Option<String>| value.clone().unwrap_or_else(|| "N/A".to_string());

    format!(
        "📋 {}\n   Name: {}\n   Facility: {}\n   Location: {}, {}\n   Square Footage: {}\n   Cost: {}\n   Status: {}\n   Start: {}",
        text(&project.project_number),
        text(&project.project_name),
        text(&project.facility_name),
        text(&project.city),
        text(&project.county),
        project
            .square_footage
            .map_or_else(|| "N/A".to_string(), |sqft| format!("{sqft} sqft")),
        project
            .estimated_cost
            .map_or_else(|| "N/A".to_string(), |cost| format!("${cost:.2}")),
        text(&project.project_status),
        text(&project.start_date),
    )
}
