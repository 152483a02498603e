//! `search` and `fetch`: the generic connector operations.

use crate::cursor::{decode_offset, encode_offset};
use crate::diagnostics::DiagnosticSink;
use crate::error::{HandlerError, RecordKind, Result};
use crate::project::load_project;
use asana_client::{AsanaApi, PageOptions, TaskSearch, TASK_SEARCH_WINDOW};
use asana_protocol::{
    serialize_json, FetchKind, FetchRequest, FetchResponse, FetchedResource, NextPage,
    ResourceContent, SearchItem, SearchKind, SearchRequest, SearchResponse, JSON_MIME_TYPE,
};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct ConnectorHandlers {
    api: Arc<dyn AsanaApi>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

#[derive(Debug)]
struct ValidSearch {
    kind: SearchKind,
    workspace: String,
    query: String,
    limit: Option<u32>,
    offset: Option<u64>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

fn missing(fields: &[(&'static str, bool)]) -> HandlerError {
    HandlerError::MissingParameters(
        fields
            .iter()
            .filter(|(_, absent)| *absent)
            .map(|(name, _)| *name)
            .collect(),
    )
}

fn validate_search(request: SearchRequest) -> Result<ValidSearch> {
    let (kind, workspace, query) = match (
        present(request.kind),
        present(request.workspace),
        present(request.query),
    ) {
        (Some(kind), Some(workspace), Some(query)) => (kind, workspace, query),
        (kind, workspace, query) => {
            return Err(missing(&[
                ("type", kind.is_none()),
                ("workspace", workspace.is_none()),
                ("query", query.is_none()),
            ]))
        }
    };

    let kind = kind
        .parse::<SearchKind>()
        .map_err(|unknown| HandlerError::UnsupportedSearchType(unknown.0))?;

    let page = request.page.unwrap_or_default();
    let offset = page
        .cursor
        .as_deref()
        .filter(|cursor| !cursor.trim().is_empty())
        .map(decode_offset)
        .transpose()?;

    Ok(ValidSearch {
        kind,
        workspace,
        query,
        limit: page.limit,
        offset,
    })
}

fn validate_fetch(request: FetchRequest) -> Result<(String, FetchKind)> {
    match (present(request.id), present(request.kind)) {
        (Some(id), Some(kind)) => {
            let kind = kind
                .parse::<FetchKind>()
                .map_err(|unknown| HandlerError::UnsupportedFetchType(unknown.0))?;
            Ok((id, kind))
        }
        (id, kind) => Err(missing(&[("id", id.is_none()), ("type", kind.is_none())])),
    }
}

fn string_field(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn search_item(record: &Value) -> SearchItem {
    SearchItem {
        id: string_field(record, "gid"),
        title: string_field(record, "name"),
        summary: string_field(record, "notes"),
    }
}

/// A full page suggests more results may exist; nothing checks that they do.
/// No cursor is issued once the next offset reaches `window`, since the
/// upstream cannot serve anything past it.
fn next_page(
    limit: Option<usize>,
    offset: Option<u64>,
    count: usize,
    window: Option<u64>,
) -> Option<NextPage> {
    let limit = limit.filter(|limit| *limit > 0)?;
    let next = offset.unwrap_or(0).saturating_add(count as u64);
    if window.is_some_and(|window| next >= window) {
        return None;
    }
    (count == limit).then(|| NextPage {
        cursor: encode_offset(next),
    })
}

impl ConnectorHandlers {
    pub fn new(api: Arc<dyn AsanaApi>, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self { api, diagnostics }
    }

    pub async fn search(&self, request: SearchRequest) -> Result<SearchResponse> {
        self.diagnostics
            .info(&format!("Received SearchRequest: {request:?}"));
        let result = self.run_search(request).await;
        if let Err(err) = &result {
            self.diagnostics.error(&format!("Search failed: {err}"));
        }
        result
    }

    pub async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        self.diagnostics
            .info(&format!("Received FetchRequest: {request:?}"));
        let result = self.run_fetch(request).await;
        if let Err(err) = &result {
            self.diagnostics.error(&format!("Fetch failed: {err}"));
        }
        result
    }

    async fn run_search(&self, request: SearchRequest) -> Result<SearchResponse> {
        let search = validate_search(request)?;
        let page = PageOptions {
            limit: search.limit,
            offset: search.offset,
        };

        let (results, window) = match search.kind {
            SearchKind::Project => {
                let projects = self
                    .api
                    .search_projects(&search.workspace, &search.query, false, page)
                    .await?;
                (projects, None)
            }
            SearchKind::Task => {
                let task_search = TaskSearch {
                    text: search.query.clone(),
                    page,
                };
                let tasks = self
                    .api
                    .search_tasks(&search.workspace, &task_search)
                    .await?;
                (tasks, Some(TASK_SEARCH_WINDOW))
            }
        };

        let limit = search
            .limit
            .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX));
        let items: Vec<SearchItem> = results
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(search_item)
            .collect();
        let next_page = next_page(limit, search.offset, items.len(), window);

        Ok(SearchResponse { items, next_page })
    }

    async fn run_fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        let (id, kind) = validate_fetch(request)?;

        let (title, text) = match kind {
            FetchKind::Task => {
                let task = self
                    .api
                    .get_task(&id)
                    .await?
                    .ok_or_else(|| HandlerError::not_found(RecordKind::Task, &id))?;
                (string_field(&task, "name"), serialize_json(&task)?)
            }
            FetchKind::Project => {
                let project =
                    load_project(self.api.as_ref(), self.diagnostics.as_ref(), &id).await?;
                (
                    project.name.clone().unwrap_or_default(),
                    serialize_json(&project)?,
                )
            }
        };

        Ok(FetchResponse {
            resource: Some(FetchedResource {
                id,
                kind,
                title,
                content: ResourceContent {
                    mime_type: JSON_MIME_TYPE.to_string(),
                    text,
                },
            }),
        })
    }
}
