//! Normalized shapes of Asana records as returned to clients.
//!
//! These are built per request from raw upstream JSON and never mutated after
//! construction.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NormalizedWorkspace {
    pub name: Option<String>,
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub is_organization: Option<bool>,
    pub email_domains: Option<Vec<String>>,
}

/// `{gid, name}` reference to a related record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RecordRef {
    pub gid: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NormalizedSection {
    pub gid: Option<String>,
    pub name: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EnumOption {
    pub gid: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NormalizedCustomField {
    pub gid: Option<String>,
    pub name: Option<String>,
    /// Asana `resource_type` of the field (normally "custom_field").
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    /// Asana field type: enum, multi_enum, number, text, date, people, ...
    pub field_type: Option<String>,
    pub description: Option<String>,
    /// Enabled options, only for enum and multi_enum fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_options: Option<Vec<EnumOption>>,
    /// Only for number fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NormalizedProject {
    pub name: Option<String>,
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub created_at: Option<String>,
    pub modified_at: Option<String>,
    pub archived: bool,
    pub public: bool,
    pub notes: Option<String>,
    pub color: Option<String>,
    pub default_view: Option<String>,
    pub due_date: Option<String>,
    pub due_on: Option<String>,
    pub start_on: Option<String>,
    pub workspace: Option<RecordRef>,
    pub team: Option<RecordRef>,
    pub sections: Vec<NormalizedSection>,
    pub custom_fields: Vec<NormalizedCustomField>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn custom_field_omits_inapplicable_extras() {
        let field = NormalizedCustomField {
            gid: Some("1".to_string()),
            name: Some("Notes".to_string()),
            resource_type: Some("custom_field".to_string()),
            field_type: Some("text".to_string()),
            description: None,
            enum_options: None,
            precision: None,
        };
        assert_eq!(
            serde_json::to_value(&field).unwrap(),
            json!({
                "gid": "1",
                "name": "Notes",
                "type": "custom_field",
                "field_type": "text",
                "description": null
            })
        );
    }

    #[test]
    fn workspace_keeps_nulls() {
        let workspace = NormalizedWorkspace {
            name: Some("Acme".to_string()),
            id: Some("9".to_string()),
            resource_type: None,
            is_organization: None,
            email_domains: None,
        };
        assert_eq!(
            serde_json::to_value(&workspace).unwrap(),
            json!({
                "name": "Acme",
                "id": "9",
                "type": null,
                "is_organization": null,
                "email_domains": null
            })
        );
    }
}
