//! `resources/list`, `resources/templates/list` and `resources/read`.

use crate::diagnostics::DiagnosticSink;
use crate::error::{HandlerError, RecordKind, Result};
use crate::format::format_workspace;
use crate::project::load_project;
use asana_client::{AsanaApi, RequestOptions};
use asana_protocol::{
    serialize_json_pretty, ListResourceTemplatesResult, ListResourcesResult, ReadResourceResult,
    ResourceContents, ResourceDescriptor, ResourceTemplateDescriptor, ResourceUri,
};
use serde_json::Value;
use std::sync::Arc;

const WORKSPACE_LIST_FIELDS: &str = "name,gid,resource_type";
const WORKSPACE_DETAIL_FIELDS: &str = "name,gid,resource_type,email_domains,is_organization";

#[derive(Clone)]
pub struct ResourceHandlers {
    api: Arc<dyn AsanaApi>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

fn gid_of(record: &Value) -> Option<&str> {
    record.get("gid").and_then(Value::as_str)
}

fn workspace_descriptor(workspace: &Value) -> Option<ResourceDescriptor> {
    let gid = gid_of(workspace)?;
    let name = workspace
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Some(ResourceDescriptor {
        uri: ResourceUri::workspace(gid).to_string(),
        name: name.to_string(),
        description: format!("Asana workspace: {name}"),
    })
}

impl ResourceHandlers {
    pub fn new(api: Arc<dyn AsanaApi>, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self { api, diagnostics }
    }

    /// One resource per workspace plus the project template.
    ///
    /// Never fails: when workspaces cannot be listed the error is logged and an
    /// empty listing without templates is returned.
    pub async fn list_resources(&self) -> ListResourcesResult {
        self.diagnostics.info("Received ListResourcesRequest");
        match self
            .api
            .list_workspaces(&RequestOptions::fields(WORKSPACE_LIST_FIELDS))
            .await
        {
            Ok(workspaces) => ListResourcesResult {
                resources: workspaces.iter().filter_map(workspace_descriptor).collect(),
                resource_templates: Some(vec![ResourceTemplateDescriptor::project()]),
            },
            Err(err) => {
                self.diagnostics
                    .error(&format!("Error listing resources: {err}"));
                ListResourcesResult {
                    resources: Vec::new(),
                    resource_templates: None,
                }
            }
        }
    }

    pub fn list_resource_templates(&self) -> ListResourceTemplatesResult {
        self.diagnostics
            .info("Received ListResourceTemplatesRequest");
        ListResourceTemplatesResult {
            resource_templates: vec![ResourceTemplateDescriptor::project()],
        }
    }

    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult> {
        self.diagnostics
            .info(&format!("Received ReadResourceRequest: {uri}"));
        let result = self.read(uri).await;
        if let Err(err) = &result {
            self.diagnostics
                .error(&format!("Error reading resource {uri}: {err}"));
        }
        result
    }

    async fn read(&self, uri: &str) -> Result<ReadResourceResult> {
        let parsed = ResourceUri::parse(uri)
            .ok_or_else(|| HandlerError::InvalidResourceUri(uri.to_string()))?;

        let gid = parsed.gid();
        let text = match &parsed {
            ResourceUri::Workspace(_) => self.read_workspace(gid).await?,
            ResourceUri::Project(_) => {
                self.read_project(gid)
                    .await
                    .map_err(|source| HandlerError::ProjectRead {
                        project_gid: gid.to_string(),
                        source: Box::new(source),
                    })?
            }
        };

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::json(uri, text)],
        })
    }

    async fn read_workspace(&self, gid: &str) -> Result<String> {
        let workspaces = self
            .api
            .list_workspaces(&RequestOptions::fields(WORKSPACE_DETAIL_FIELDS))
            .await?;
        let workspace = workspaces
            .iter()
            .find(|workspace| gid_of(workspace) == Some(gid))
            .and_then(format_workspace)
            .ok_or_else(|| HandlerError::not_found(RecordKind::Workspace, gid))?;
        Ok(serialize_json_pretty(&workspace)?)
    }

    async fn read_project(&self, gid: &str) -> Result<String> {
        let project = load_project(self.api.as_ref(), self.diagnostics.as_ref(), gid).await?;
        Ok(serialize_json_pretty(&project)?)
    }
}
