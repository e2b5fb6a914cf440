//! TDLR field names mapped onto the canonical schema
//!
//! Snake-case names come from detail-page labels, PascalCase names from the
//! listing JSON. Detail values are listed first so they take precedence.

use crate::mapper::{FieldMapper, FieldMapping};

pub const FIELD_MAPPING: FieldMapping = &[
    ("project_number", &["project_number", "ProjectNumber"]),
    ("project_name", &["project_name", "ProjectName"]),
    ("facility_name", &["facility_name", "FacilityName"]),
    ("location_address", &["location_address", "LocationAddress"]),
    ("city", &["city", "City", "LocationCity"]),
    ("county", &["county", "County", "LocationCounty"]),
    ("start_date", &["start_date", "StartDate"]),
    ("completion_date", &["completion_date", "CompletionDate"]),
    ("estimated_cost", &["estimated_cost", "EstimatedCost"]),
    ("type_of_work", &["type_of_work", "TypeOfWork"]),
    ("type_of_funds", &["type_of_funds", "TypeOfFunds"]),
    ("scope_of_work", &["scope_of_work", "ScopeOfWork"]),
    ("square_footage", &["square_footage", "SquareFootage"]),
    ("project_status", &["project_status", "ProjectStatus", "CurrentStatus"]),
    ("owner_name", &["owner_name", "OwnerName"]),
    ("owner_address", &["owner_address"]),
    ("owner_phone", &["owner_phone"]),
    ("design_firm_name", &["design_firm_name", "DesignFirmName"]),
    ("design_firm_address", &["design_firm_address"]),
    ("ras_name", &["ras_name", "RasName"]),
    ("ras_number", &["ras_number", "RasNumber"]),
    ("registration_date", &["registration_date", "RegistrationDate", "ProjectCreatedOn"]),
];

pub const MAPPER: FieldMapper = FieldMapper::new(FIELD_MAPPING);
