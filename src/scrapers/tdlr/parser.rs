use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::models::{ListingEntry, ListingPage, Project};
use crate::parser::{DetailDocument, city_from_address, parse_decimal, parse_whole};

use super::mapper::MAPPER;

/// Detail page labels and the raw field each one fills
const TEXT_LABELS: &[(&str, &str)] = &[
    ("project_name", "Project Name:"),
    ("facility_name", "Facility Name:"),
    ("location_address", "Location Address:"),
    ("county", "Location County:"),
    ("start_date", "Start Date:"),
    ("completion_date", "Completion Date:"),
    ("type_of_work", "Type of Work:"),
    ("type_of_funds", "Type of Funds:"),
    ("scope_of_work", "Scope of Work:"),
    ("project_status", "Current Status:"),
    ("owner_name", "Owner Name:"),
    ("owner_address", "Owner Address:"),
    ("owner_phone", "Owner Phone:"),
    ("design_firm_name", "Design Firm Name:"),
    ("design_firm_address", "Design Firm Address:"),
    ("ras_name", "RAS Name:"),
    ("ras_number", "RAS #:"),
    ("registration_date", "Registration Date:"),
];

const COST_LABEL: &str = "Estimated Cost:";
const SQUARE_FOOTAGE_LABEL: &str = "Square Footage:";

#[derive(Debug, Clone, Copy, Default)]
pub struct TdlrParser;

impl TdlrParser {
    /// Listing rows that carry a project number
    pub fn parse_project_list(&self, page: &ListingPage) -> Vec<ListingEntry> {
        page.data
            .iter()
            .filter_map(|row| {
                let identifier = match row.get("ProjectNumber")? {
                    Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
                    Value::Number(n) => n.to_string(),
                    _ => return None,
                };
                Some(ListingEntry {
                    identifier,
                    fields: row.clone(),
                })
            })
            .collect()
    }

    /// Build a project from a detail page, falling back to listing values
    /// for anything the page does not show.
    pub fn parse_project_details(
        &self,
        markup: &str,
        project_number: &str,
        listing_fields: &Map<String, Value>,
    ) -> Result<Project, ParseError> {
        let document = DetailDocument::parse(markup);
        let mut raw = listing_fields.clone();
        let mut found = 0;

        for (field, label) in TEXT_LABELS {
            if let Some(value) = document.field_value(label) {
                raw.insert((*field).to_string(), Value::String(value));
                found += 1;
            }
        }

        if let Some(cost) = document.field_value(COST_LABEL) {
            found += 1;
            if let Some(cost) = parse_decimal(&cost).and_then(serde_json::Number::from_f64) {
                raw.insert("estimated_cost".to_string(), Value::Number(cost));
            }
        }

        if let Some(area) = document.field_value(SQUARE_FOOTAGE_LABEL) {
            found += 1;
            if let Some(area) = parse_whole(&area) {
                raw.insert("square_footage".to_string(), Value::from(area));
            }
        }

        if found == 0 {
            return Err(ParseError(project_number.to_string()));
        }

        raw.insert(
            "project_number".to_string(),
            Value::String(project_number.to_string()),
        );

        let mut fields = MAPPER.map_fields(&raw);
        if let Some(city) = fields
            .get("location_address")
            .and_then(Value::as_str)
            .and_then(city_from_address)
        {
            fields.insert("city".to_string(), Value::String(city));
        }

        Ok(Project::from_fields(&fields))
    }
}
