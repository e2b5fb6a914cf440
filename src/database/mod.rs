use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, migrate::MigrateDatabase};
use tracing::{info, warn};

use crate::models::Project;

/// Most rows a search returns
pub const SEARCH_LIMIT: i64 = 50;

const SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS projects (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        dedup_key TEXT NOT NULL UNIQUE,
        project_id TEXT,
        project_number TEXT,
        project_name TEXT,
        facility_name TEXT,
        location_address TEXT,
        city TEXT,
        county TEXT,
        start_date TEXT,
        completion_date TEXT,
        estimated_cost REAL,
        type_of_work TEXT,
        type_of_funds TEXT,
        scope_of_work TEXT,
        square_footage INTEGER,
        project_status TEXT,
        owner_name TEXT,
        owner_address TEXT,
        owner_phone TEXT,
        design_firm_name TEXT,
        design_firm_address TEXT,
        ras_name TEXT,
        ras_number TEXT,
        registration_date TEXT,
        date_scraped TEXT NOT NULL
    )
";

/// Result of writing one project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    /// A row with the same dedup key already exists; nothing was written
    Duplicate,
    /// The project has neither a remote id nor a project number
    MissingKey,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub inserted: usize,
    pub duplicates: usize,
    pub skipped: usize,
}

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the SQLite file at `path`
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db_url = format!("sqlite:{}", path.display());

        if !Sqlite::database_exists(&db_url).await.unwrap_or(false) {
            info!("Creating database file {}", path.display());
            Sqlite::create_database(&db_url)
                .await
                .with_context(|| format!("Failed to create database at {}", path.display()))?;
        }

        let pool = SqlitePool::connect(&db_url)
            .await
            .with_context(|| format!("Failed to open database at {}", path.display()))?;

        sqlx::query(SCHEMA).execute(&pool).await?;

        info!("Database initialized at {}", path.display());
        Ok(Self { pool })
    }

    /// Insert `project` unless its dedup key is already stored.
    ///
    /// The row is written by a single statement, so it lands with every
    /// field or not at all.
    ///
    /// # Returns
    /// * `Result<SaveOutcome>` - Whether the row was inserted, already
    ///   present, or had no key to store it under
    pub async fn save(&self, project: &Project) -> Result<SaveOutcome> {
        let Some(key) = project.dedup_key() else {
            return Ok(SaveOutcome::MissingKey);
        };

        let result = sqlx::query(
            r"
            INSERT INTO projects (
                dedup_key, project_id, project_number, project_name, facility_name,
                location_address, city, county, start_date, completion_date,
                estimated_cost, type_of_work, type_of_funds, scope_of_work,
                square_footage, project_status, owner_name, owner_address,
                owner_phone, design_firm_name, design_firm_address,
                ras_name, ras_number, registration_date, date_scraped
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(dedup_key) DO NOTHING
            ",
        )
        .bind(key)
        .bind(&project.project_id)
        .bind(&project.project_number)
        .bind(&project.project_name)
        .bind(&project.facility_name)
        .bind(&project.location_address)
        .bind(&project.city)
        .bind(&project.county)
        .bind(&project.start_date)
        .bind(&project.completion_date)
        .bind(project.estimated_cost)
        .bind(&project.type_of_work)
        .bind(&project.type_of_funds)
        .bind(&project.scope_of_work)
        .bind(project.square_footage)
        .bind(&project.project_status)
        .bind(&project.owner_name)
        .bind(&project.owner_address)
        .bind(&project.owner_phone)
        .bind(&project.design_firm_name)
        .bind(&project.design_firm_address)
        .bind(&project.ras_name)
        .bind(&project.ras_number)
        .bind(&project.registration_date)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(SaveOutcome::Duplicate)
        } else {
            Ok(SaveOutcome::Inserted)
        }
    }

    /// Save each project in turn; duplicates are counted, not fatal.
    pub async fn save_many(&self, projects: &[Project]) -> Result<SaveSummary> {
        let mut summary = SaveSummary::default();

        for project in projects {
            match self.save(project).await? {
                SaveOutcome::Inserted => summary.inserted += 1,
                SaveOutcome::Duplicate => summary.duplicates += 1,
                SaveOutcome::MissingKey => {
                    warn!(
                        "Skipping project without id or number: {:?}",
                        project.project_name
                    );
                    summary.skipped += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Case-insensitive substring search over number, name, facility, city
    /// and county, newest registration first.
    pub async fn search(&self, query: &str) -> Result<Vec<Project>> {
        let pattern = format!("%{}%", escape_like(query));

        let projects = sqlx::query_as::<_, Project>(
            r"
            SELECT * FROM projects
            WHERE project_number LIKE ? ESCAPE '\'
               OR project_name LIKE ? ESCAPE '\'
               OR facility_name LIKE ? ESCAPE '\'
               OR city LIKE ? ESCAPE '\'
               OR county LIKE ? ESCAPE '\'
            ORDER BY registration_date DESC, id DESC
            LIMIT ?
            ",
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
