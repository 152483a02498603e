//! Raw Asana JSON -> normalized client records.
//!
//! Every function here is total: absent, `null`, or wrongly-typed upstream
//! values become `None` (or the documented default) instead of an error.
//! Defaults are applied on absence only, so `""`, `0` and `false` survive as
//! sent.

use asana_protocol::{
    EnumOption, NormalizedCustomField, NormalizedProject, NormalizedSection, NormalizedWorkspace,
    RecordRef,
};
use serde_json::Value;

fn text(record: &Value, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(str::to_string)
}

fn flag(record: &Value, key: &str) -> Option<bool> {
    record.get(key).and_then(Value::as_bool)
}

fn strings(record: &Value, key: &str) -> Option<Vec<String>> {
    record.get(key).and_then(Value::as_array).map(|values| {
        values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

fn record_ref(record: &Value, key: &str) -> Option<RecordRef> {
    record
        .get(key)
        .filter(|nested| nested.is_object())
        .map(|nested| RecordRef {
            gid: text(nested, "gid"),
            name: text(nested, "name"),
        })
}

/// `None` unless `workspace` is a JSON object.
pub fn format_workspace(workspace: &Value) -> Option<NormalizedWorkspace> {
    if !workspace.is_object() {
        return None;
    }
    Some(NormalizedWorkspace {
        name: text(workspace, "name"),
        id: text(workspace, "gid"),
        resource_type: text(workspace, "resource_type"),
        is_organization: flag(workspace, "is_organization"),
        email_domains: strings(workspace, "email_domains"),
    })
}

/// Normalizes project custom field settings. Anything but an array yields an
/// empty list; settings without a nested `custom_field` object are dropped.
pub fn format_custom_field_settings(settings: &Value) -> Vec<NormalizedCustomField> {
    let Some(settings) = settings.as_array() else {
        return Vec::new();
    };
    settings
        .iter()
        .filter_map(|setting| setting.get("custom_field"))
        .filter(|field| field.is_object())
        .map(format_custom_field)
        .collect()
}

fn format_custom_field(field: &Value) -> NormalizedCustomField {
    let field_type = text(field, "type");
    let mut formatted = NormalizedCustomField {
        gid: text(field, "gid"),
        name: text(field, "name"),
        resource_type: text(field, "resource_type"),
        field_type: field_type.clone(),
        description: text(field, "description"),
        enum_options: None,
        precision: None,
    };

    match field_type.as_deref() {
        Some("enum" | "multi_enum") => {
            formatted.enum_options = field
                .get("enum_options")
                .and_then(Value::as_array)
                .map(|options| enabled_options(options));
        }
        Some("number") => {
            formatted.precision = Some(field.get("precision").and_then(Value::as_i64).unwrap_or(0));
        }
        // text, date, people and unknown types carry only the core fields.
        _ => {}
    }
    formatted
}

fn enabled_options(options: &[Value]) -> Vec<EnumOption> {
    options
        .iter()
        .filter(|option| option.get("enabled").and_then(Value::as_bool) != Some(false))
        .map(|option| EnumOption {
            gid: text(option, "gid"),
            name: text(option, "name"),
        })
        .collect()
}

/// `None` unless `project` is a JSON object. `custom_fields` must already be
/// normalized; it is passed through untouched.
pub fn format_project(
    project: &Value,
    sections: &[Value],
    custom_fields: Vec<NormalizedCustomField>,
) -> Option<NormalizedProject> {
    if !project.is_object() {
        return None;
    }
    Some(NormalizedProject {
        name: text(project, "name"),
        id: text(project, "gid"),
        resource_type: text(project, "resource_type"),
        created_at: text(project, "created_at"),
        modified_at: text(project, "modified_at"),
        archived: flag(project, "archived").unwrap_or(false),
        public: flag(project, "public").unwrap_or(false),
        notes: text(project, "notes"),
        color: text(project, "color"),
        default_view: text(project, "default_view"),
        due_date: text(project, "due_date"),
        due_on: text(project, "due_on"),
        start_on: text(project, "start_on"),
        workspace: record_ref(project, "workspace"),
        team: record_ref(project, "team"),
        sections: sections
            .iter()
            .map(|section| NormalizedSection {
                gid: text(section, "gid"),
                name: text(section, "name"),
                created_at: text(section, "created_at"),
            })
            .collect(),
        custom_fields,
    })
}
