use crate::diagnostics::DiagnosticSink;
use crate::error::{HandlerError, RecordKind, Result};
use crate::format::{format_custom_field_settings, format_project};
use asana_client::{AsanaApi, RequestOptions};
use asana_protocol::NormalizedProject;
use serde_json::Value;

pub(crate) const PROJECT_FIELDS: &str = "name,gid,resource_type,created_at,modified_at,archived,public,notes,color,default_view,due_date,due_on,start_on,workspace,team";

pub(crate) const SECTION_FIELDS: &str = "name,gid,created_at";

pub(crate) const CUSTOM_FIELD_SETTING_FIELDS: &str = "custom_field.name,custom_field.gid,custom_field.resource_type,custom_field.type,custom_field.description,custom_field.enum_options,custom_field.enum_options.gid,custom_field.enum_options.name,custom_field.enum_options.enabled,custom_field.precision,custom_field.format";

/// Fetches a project and enriches it with sections and custom fields.
///
/// Only the project lookup itself can fail the call. Sections and custom field
/// settings are fetched one after the other, and each falls back to an empty
/// list (with a warning) when its request fails.
pub(crate) async fn load_project(
    api: &dyn AsanaApi,
    diagnostics: &dyn DiagnosticSink,
    project_gid: &str,
) -> Result<NormalizedProject> {
    let project = api
        .get_project(project_gid, &RequestOptions::fields(PROJECT_FIELDS))
        .await?
        .ok_or_else(|| HandlerError::not_found(RecordKind::Project, project_gid))?;

    let sections = match api
        .get_project_sections(project_gid, &RequestOptions::fields(SECTION_FIELDS))
        .await
    {
        Ok(sections) => sections,
        Err(err) => {
            diagnostics.warn(&format!(
                "Error fetching sections for project {project_gid}: {err}"
            ));
            Vec::new()
        }
    };

    let custom_fields = match api
        .get_project_custom_field_settings(
            project_gid,
            &RequestOptions::fields(CUSTOM_FIELD_SETTING_FIELDS),
        )
        .await
    {
        Ok(settings) => format_custom_field_settings(&Value::Array(settings)),
        Err(err) => {
            diagnostics.warn(&format!(
                "Error fetching custom fields for project {project_gid}: {err}"
            ));
            Vec::new()
        }
    };

    format_project(&project, &sections, custom_fields)
        .ok_or_else(|| HandlerError::not_found(RecordKind::Project, project_gid))
}
