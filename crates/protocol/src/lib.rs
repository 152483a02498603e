//! Wire types shared by the Asana MCP server.
//!
//! Inbound requests keep every field optional so that validation happens in the
//! handlers with a proper error instead of a deserialization failure. Outbound
//! envelopes serialize with the camelCase keys MCP clients expect, while the
//! normalized records in [`records`] keep Asana's snake_case vocabulary.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod records;
pub mod uri;

pub use records::{
    EnumOption, NormalizedCustomField, NormalizedProject, NormalizedSection, NormalizedWorkspace,
    RecordRef,
};
pub use uri::{ResourceUri, PROJECT_URI_TEMPLATE, RESOURCE_SCHEME};

/// MIME type of every text payload produced by the server.
pub const JSON_MIME_TYPE: &str = "application/json";

/// Unrecognized value of a `type` discriminant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for UnknownKind {}

/// What a `search` call looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Project,
    Task,
}

impl FromStr for SearchKind {
    type Err = UnknownKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "project" => Ok(Self::Project),
            "task" => Ok(Self::Task),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// What a `fetch` call retrieves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    Task,
    Project,
}

impl FromStr for FetchKind {
    type Err = UnknownKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "task" => Ok(Self::Task),
            "project" => Ok(Self::Project),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchPage {
    #[schemars(description = "Maximum number of items to return")]
    pub limit: Option<u32>,

    #[schemars(description = "Opaque continuation token from a previous response's nextPage.cursor")]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchRequest {
    #[serde(rename = "type")]
    #[schemars(description = "What to search for: 'project' or 'task'")]
    pub kind: Option<String>,

    #[schemars(description = "GID of the Asana workspace to search in")]
    pub workspace: Option<String>,

    #[schemars(description = "Search text (project names are matched as a case-insensitive pattern)")]
    pub query: Option<String>,

    #[schemars(description = "Optional pagination: { limit, cursor }. Task search reaches only the first 100 matches")]
    pub page: Option<SearchPage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchItem {
    pub id: String,
    pub title: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NextPage {
    pub cursor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub items: Vec<SearchItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<NextPage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FetchRequest {
    #[schemars(description = "GID of the task or project to fetch")]
    pub id: Option<String>,

    #[serde(rename = "type")]
    #[schemars(description = "What to fetch: 'task' or 'project'")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    pub mime_type: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FetchedResource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FetchKind,
    pub title: String,
    pub content: ResourceContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FetchResponse {
    pub resource: Option<FetchedResource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceDescriptor {
    pub uri: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTemplateDescriptor {
    pub uri_template: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

impl ResourceTemplateDescriptor {
    /// Template for addressing a project by GID.
    pub fn project() -> Self {
        Self {
            uri_template: PROJECT_URI_TEMPLATE.to_string(),
            name: "Asana Project Template".to_string(),
            description: "Get details for a specific Asana project by GID".to_string(),
            mime_type: JSON_MIME_TYPE.to_string(),
        }
    }
}

/// `resources/list` payload. Templates are absent when listing degraded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListResourcesResult {
    pub resources: Vec<ResourceDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_templates: Option<Vec<ResourceTemplateDescriptor>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListResourceTemplatesResult {
    pub resource_templates: Vec<ResourceTemplateDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

impl ResourceContents {
    pub fn json(uri: impl Into<String>, text: String) -> Self {
        Self {
            uri: uri.into(),
            mime_type: JSON_MIME_TYPE.to_string(),
            text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContents>,
}

/// Structured error attached to failed tool calls.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

pub fn serialize_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn search_request_reads_type_key() {
        let request: SearchRequest = serde_json::from_value(json!({
            "type": "task",
            "workspace": "42",
            "query": "launch",
            "page": { "limit": 5 }
        }))
        .expect("parse request");
        assert_eq!(request.kind.as_deref(), Some("task"));
        assert_eq!(request.page.and_then(|p| p.limit), Some(5));
    }

    #[test]
    fn search_request_tolerates_missing_fields() {
        let request: SearchRequest = serde_json::from_value(json!({})).expect("parse request");
        assert!(request.kind.is_none());
        assert!(request.workspace.is_none());
        assert!(request.query.is_none());
    }

    #[test]
    fn request_schema_carries_field_descriptions() {
        let schema = schemars::schema_for!(SearchRequest);
        let properties = &schema.as_value()["properties"];
        assert_eq!(
            properties["type"]["description"],
            json!("What to search for: 'project' or 'task'")
        );
        assert_eq!(
            properties["workspace"]["description"],
            json!("GID of the Asana workspace to search in")
        );

        let schema = schemars::schema_for!(FetchRequest);
        assert_eq!(
            schema.as_value()["properties"]["id"]["description"],
            json!("GID of the task or project to fetch")
        );
    }

    #[test]
    fn kinds_parse_only_known_tags() {
        assert_eq!("project".parse::<SearchKind>(), Ok(SearchKind::Project));
        assert_eq!("task".parse::<SearchKind>(), Ok(SearchKind::Task));
        assert_eq!(
            "portfolio".parse::<SearchKind>(),
            Err(UnknownKind("portfolio".to_string()))
        );
        assert!("Task".parse::<FetchKind>().is_err());
    }

    #[test]
    fn next_page_is_omitted_when_absent() {
        let response = SearchResponse {
            items: Vec::new(),
            next_page: None,
        };
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({ "items": [] }));

        let response = SearchResponse {
            items: Vec::new(),
            next_page: Some(NextPage {
                cursor: "abc".to_string(),
            }),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "items": [], "nextPage": { "cursor": "abc" } })
        );
    }

    #[test]
    fn fetch_response_uses_wire_keys() {
        let response = FetchResponse {
            resource: Some(FetchedResource {
                id: "7".to_string(),
                kind: FetchKind::Task,
                title: "Write docs".to_string(),
                content: ResourceContent {
                    mime_type: JSON_MIME_TYPE.to_string(),
                    text: "{}".to_string(),
                },
            }),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "resource": {
                    "id": "7",
                    "type": "task",
                    "title": "Write docs",
                    "content": { "mimeType": "application/json", "text": "{}" }
                }
            })
        );
    }

    #[test]
    fn degraded_listing_drops_templates_key() {
        let listing = ListResourcesResult {
            resources: Vec::new(),
            resource_templates: None,
        };
        assert_eq!(serde_json::to_value(&listing).unwrap(), json!({ "resources": [] }));
    }
}
