//! rmcp server surface: the `search`/`fetch` tools and the resource endpoints.

use crate::connector::ConnectorHandlers;
use crate::diagnostics::DiagnosticSink;
use crate::error::HandlerError;
use crate::resources::ResourceHandlers;
use asana_client::AsanaApi;
use asana_protocol::{serialize_json_pretty, ErrorEnvelope, FetchRequest, SearchRequest};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    self as mcp, CallToolResult, Content, Implementation, PaginatedRequestParam,
    ReadResourceRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

const INSTRUCTIONS: &str = "Asana MCP exposes Asana workspaces, projects and tasks. \
Use 'search' with type 'project' or 'task', a workspace GID and a query to find records, \
then 'fetch' with the returned id to read one in full. Workspaces are listed as resources \
(asana://workspace/{gid}); projects can be read via asana://project/{project_gid}.";

#[derive(Clone)]
pub struct AsanaMcpService {
    connector: ConnectorHandlers,
    resources: ResourceHandlers,
    tool_router: ToolRouter<Self>,
}

impl AsanaMcpService {
    pub fn new(api: Arc<dyn AsanaApi>, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            connector: ConnectorHandlers::new(api.clone(), diagnostics.clone()),
            resources: ResourceHandlers::new(api, diagnostics),
            tool_router: Self::tool_router(),
        }
    }
}

fn error_envelope(err: &HandlerError) -> ErrorEnvelope {
    ErrorEnvelope {
        code: err.code().to_string(),
        message: err.to_string(),
        hint: err.hint().map(str::to_string),
    }
}

fn tool_error(err: &HandlerError) -> CallToolResult {
    let mut result = CallToolResult::error(vec![Content::text(format!("Error: {err}"))]);
    result.structured_content = Some(json!({ "error": error_envelope(err) }));
    result
}

fn tool_result<T: Serialize>(outcome: crate::error::Result<T>) -> CallToolResult {
    match outcome.and_then(|response| Ok(serialize_json_pretty(&response)?)) {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(err) => tool_error(&err),
    }
}

/// Maps a handler failure onto the JSON-RPC error space.
fn mcp_error(err: &HandlerError) -> McpError {
    let data = Some(json!(error_envelope(err)));
    if err.is_invalid_request() {
        McpError::invalid_params(err.to_string(), data)
    } else if err.is_not_found() {
        McpError::resource_not_found(err.to_string(), data)
    } else {
        McpError::internal_error(err.to_string(), data)
    }
}

/// Re-shapes one of our payloads into the matching rmcp model type.
fn into_mcp<T: DeserializeOwned>(value: impl Serialize) -> Result<T, McpError> {
    serde_json::to_value(value)
        .and_then(serde_json::from_value)
        .map_err(|err| McpError::internal_error(format!("Failed to encode result: {err}"), None))
}

#[tool_router]
impl AsanaMcpService {
    #[tool(description = "Search Asana projects or tasks in a workspace. Requires type ('project' or 'task'), workspace (GID) and query. Optional page.limit bounds the result count; pass nextPage.cursor back as page.cursor to continue.")]
    pub async fn search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(tool_result(self.connector.search(request).await))
    }

    #[tool(description = "Fetch one Asana task or project by GID. Requires id and type ('task' or 'project'). Projects include their sections and custom field definitions.")]
    pub async fn fetch(
        &self,
        Parameters(request): Parameters<FetchRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(tool_result(self.connector.fetch(request).await))
    }
}

#[tool_handler]
impl ServerHandler for AsanaMcpService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<mcp::ListResourcesResult, McpError> {
        let listing = self.resources.list_resources().await;
        // rmcp's listing has no room for templates; they are served by
        // resources/templates/list.
        into_mcp(json!({ "resources": listing.resources }))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<mcp::ListResourceTemplatesResult, McpError> {
        into_mcp(self.resources.list_resource_templates())
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<mcp::ReadResourceResult, McpError> {
        match self.resources.read_resource(&uri).await {
            Ok(result) => into_mcp(result),
            Err(err) => Err(mcp_error(&err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::CursorError;
    use crate::error::RecordKind;
    use asana_client::AsanaError;
    use asana_protocol::{ListResourceTemplatesResult, ResourceTemplateDescriptor};
    use pretty_assertions::assert_eq;
    use rmcp::model::ErrorCode;

    #[test]
    fn envelope_carries_code_and_hint() {
        let err = HandlerError::UnsupportedSearchType("portfolio".to_string());
        let envelope = error_envelope(&err);
        assert_eq!(envelope.code, "unsupported_type");
        assert_eq!(envelope.message, "Unsupported search type: portfolio");
        assert!(envelope.hint.is_some());
    }

    #[test]
    fn tool_errors_are_flagged_with_structured_envelope() {
        let result = tool_error(&HandlerError::MissingParameters(vec!["query"]));
        assert_eq!(result.is_error, Some(true));
        let text = result
            .content
            .first()
            .and_then(|c| c.as_text())
            .map(|t| t.text.clone());
        assert_eq!(
            text.as_deref(),
            Some("Error: Missing required parameters: query")
        );
        let structured = result.structured_content.expect("structured error");
        assert_eq!(structured["error"]["code"], json!("invalid_request"));
    }

    #[test]
    fn handler_errors_map_to_rpc_codes() {
        let invalid = mcp_error(&HandlerError::InvalidResourceUri("x".to_string()));
        assert_eq!(invalid.code, ErrorCode::INVALID_PARAMS);

        let cursor = mcp_error(&HandlerError::InvalidCursor(CursorError::Malformed));
        assert_eq!(cursor.code, ErrorCode::INVALID_PARAMS);

        let missing = mcp_error(&HandlerError::ProjectRead {
            project_gid: "1".to_string(),
            source: Box::new(HandlerError::not_found(RecordKind::Project, "1")),
        });
        assert_eq!(missing.code, ErrorCode::RESOURCE_NOT_FOUND);

        let upstream = mcp_error(&HandlerError::from(AsanaError::api(502, "bad gateway")));
        assert_eq!(upstream.code, ErrorCode::INTERNAL_ERROR);
    }

    #[test]
    fn templates_convert_to_rmcp_model() {
        let converted: mcp::ListResourceTemplatesResult = into_mcp(ListResourceTemplatesResult {
            resource_templates: vec![ResourceTemplateDescriptor::project()],
        })
        .expect("convert");
        assert_eq!(converted.resource_templates.len(), 1);
        assert_eq!(
            converted.resource_templates[0].raw.uri_template,
            "asana://project/{project_gid}"
        );
    }
}
