//! Maps source-specific field names onto the canonical project schema

use serde_json::{Map, Value};

/// Canonical field name paired with the source field names that may carry it,
/// in order of preference.
pub type FieldMapping = &'static [(&'static str, &'static [&'static str])];

#[derive(Debug, Clone, Copy)]
pub struct FieldMapper {
    mapping: FieldMapping,
}

impl FieldMapper {
    pub const fn new(mapping: FieldMapping) -> Self {
        Self { mapping }
    }

    /// For each canonical field, take the first candidate present in `raw`
    /// with a non-null value. Canonical fields with no match are left out.
    pub fn map_fields(&self, raw: &Map<String, Value>) -> Map<String, Value> {
        let mut mapped = Map::new();

        for (canonical, candidates) in self.mapping {
            let value = candidates
                .iter()
                .filter_map(|candidate| raw.get(*candidate))
                .find(|value| !value.is_null());

            if let Some(value) = value {
                mapped.insert((*canonical).to_string(), value.clone());
            }
        }

        mapped
    }

    /// Canonical field names this mapper can produce
    pub fn canonical_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.mapping.iter().map(|(canonical, _)| *canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MAPPING: FieldMapping = &[
        ("project_number", &["project_number", "ProjectNumber"]),
        ("estimated_cost", &["estimated_cost"]),
        ("county", &["county", "County"]),
        ("project_name", &["title", "name", "project_title"]),
    ];

    fn raw(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn null_values_are_omitted() {
        let mapper = FieldMapper::new(MAPPING);
        let mapped = mapper.map_fields(&raw(json!({
            "project_number": "T1",
            "estimated_cost": null,
            "county": "Travis",
        })));

        assert!(!mapped.contains_key("estimated_cost"));
        assert_eq!(mapped["county"], json!("Travis"));
        assert_eq!(mapped["project_number"], json!("T1"));
    }

    #[test]
    fn first_present_candidate_wins() {
        let mapper = FieldMapper::new(MAPPING);
        let mapped = mapper.map_fields(&raw(json!({
            "title": null,
            "name": "Library Annex",
            "project_title": "ignored",
            "ProjectNumber": "T2",
        })));

        assert_eq!(mapped["project_name"], json!("Library Annex"));
        assert_eq!(mapped["project_number"], json!("T2"));
        assert_eq!(mapped.len(), 2);
    }

    #[test]
    fn unrelated_input_maps_to_nothing() {
        let mapper = FieldMapper::new(MAPPING);
        let mapped = mapper.map_fields(&raw(json!({"color": "red"})));

        assert!(mapped.is_empty());
        assert_eq!(mapper.canonical_fields().count(), 4);
    }
}
