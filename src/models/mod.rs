//! Data models for construction projects and the listing wire format

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A construction project normalized from any source.
///
/// Every field is independently optional. `date_scraped` is stamped by the
/// database when the row is written and is never taken from a source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub project_id: Option<String>,
    pub project_number: Option<String>,
    pub project_name: Option<String>,
    pub facility_name: Option<String>,

    pub location_address: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,

    pub start_date: Option<String>,
    pub completion_date: Option<String>,

    pub estimated_cost: Option<f64>,
    pub square_footage: Option<i64>,

    pub type_of_work: Option<String>,
    pub type_of_funds: Option<String>,
    pub scope_of_work: Option<String>,
    pub project_status: Option<String>,

    pub owner_name: Option<String>,
    pub owner_address: Option<String>,
    pub owner_phone: Option<String>,
    pub design_firm_name: Option<String>,
    pub design_firm_address: Option<String>,
    pub ras_name: Option<String>,
    pub ras_number: Option<String>,

    pub registration_date: Option<String>,
    pub date_scraped: Option<DateTime<Utc>>,
}

impl Project {
    /// Build a project from canonical field values.
    ///
    /// Values of the wrong shape are skipped one field at a time, so a bad
    /// cost never costs the record its name or address. Any `date_scraped`
    /// key is ignored.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            project_id: text(fields, "project_id"),
            project_number: text(fields, "project_number"),
            project_name: text(fields, "project_name"),
            facility_name: text(fields, "facility_name"),
            location_address: text(fields, "location_address"),
            city: text(fields, "city"),
            county: text(fields, "county"),
            start_date: text(fields, "start_date"),
            completion_date: text(fields, "completion_date"),
            estimated_cost: float(fields, "estimated_cost"),
            square_footage: integer(fields, "square_footage"),
            type_of_work: text(fields, "type_of_work"),
            type_of_funds: text(fields, "type_of_funds"),
            scope_of_work: text(fields, "scope_of_work"),
            project_status: text(fields, "project_status"),
            owner_name: text(fields, "owner_name"),
            owner_address: text(fields, "owner_address"),
            owner_phone: text(fields, "owner_phone"),
            design_firm_name: text(fields, "design_firm_name"),
            design_firm_address: text(fields, "design_firm_address"),
            ras_name: text(fields, "ras_name"),
            ras_number: text(fields, "ras_number"),
            registration_date: text(fields, "registration_date"),
            date_scraped: None,
        }
    }

    /// The key the database treats as identity: the remote id when the source
    /// provides one, otherwise the project number.
    pub fn dedup_key(&self) -> Option<&str> {
        [self.project_id.as_deref(), self.project_number.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|key| !key.is_empty())
    }
}

fn text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn float(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    match fields.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

fn integer(fields: &Map<String, Value>, key: &str) -> Option<i64> {
    match fields.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

/// What one source scrape produced.
///
/// `listed` counts the listing entries whose detail pages were requested;
/// `failed` counts those that timed out, errored or did not parse.
#[derive(Debug, Clone, Default)]
pub struct ScrapeOutcome {
    pub projects: Vec<Project>,
    pub listed: usize,
    pub failed: usize,
}

/// Describes a scraping source for `list-sources` and logs
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub name: String,
    pub description: String,
    pub url: String,
    pub fields_available: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[allow(dead_code)]
    Asc,
    Desc,
}

/// Body of a paginated listing request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequest {
    pub page_number: u32,
    pub page_size: usize,
    pub sort_column: String,
    pub sort_direction: SortDirection,
    pub filters: Map<String, Value>,
}

impl ListingRequest {
    pub fn new(page_number: u32, page_size: usize, sort_column: &str) -> Self {
        Self {
            page_number,
            page_size,
            sort_column: sort_column.to_string(),
            sort_direction: SortDirection::Desc,
            filters: Map::new(),
        }
    }
}

/// One page of listing results as returned by the remote endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    #[serde(default)]
    pub data: Vec<Map<String, Value>>,
    #[serde(default)]
    pub total_records: Option<u64>,
}

/// A listing row reduced to the identifier used to fetch its detail page
#[derive(Debug, Clone)]
pub struct ListingEntry {
    pub identifier: String,
    pub fields: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_fields_skips_mistyped_values() {
        let fields = json!({
            "project_number": "TABS2026000001",
            "project_name": "Clinic Renovation",
            "estimated_cost": {"amount": 12},
            "square_footage": "4,200",
            "date_scraped": "2020-01-01T00:00:00Z",
        });
        let project = Project::from_fields(fields.as_object().unwrap());

        assert_eq!(project.project_name.as_deref(), Some("Clinic Renovation"));
        assert_eq!(project.estimated_cost, None);
        assert_eq!(project.square_footage, Some(4200));
        assert_eq!(project.date_scraped, None);
    }

    #[test]
    fn dedup_key_prefers_project_id() {
        let mut project = Project {
            project_number: Some("TABS1".to_string()),
            ..Project::default()
        };
        assert_eq!(project.dedup_key(), Some("TABS1"));

        project.project_id = Some("remote-9".to_string());
        assert_eq!(project.dedup_key(), Some("remote-9"));

        project.project_id = Some("  ".to_string());
        assert_eq!(project.dedup_key(), Some("TABS1"));
    }

    #[test]
    fn listing_request_serializes_camel_case() {
        let request = ListingRequest::new(2, 15, "ProjectCreatedOn");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body,
            json!({
                "pageNumber": 2,
                "pageSize": 15,
                "sortColumn": "ProjectCreatedOn",
                "sortDirection": "desc",
                "filters": {},
            })
        );
    }
}
