use crate::api::{AsanaApi, PageOptions, RequestOptions, TaskSearch, TASK_SEARCH_WINDOW};
use crate::error::{AsanaError, Result};
use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://app.asana.com/api/1.0";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Asana's maximum page size for collection and search endpoints.
const MAX_PAGE_SIZE: u32 = 100;

/// Upper bound on `next_page` hops for a single collection read.
const MAX_COLLECTION_PAGES: usize = 50;

const SEARCH_FIELDS: &str = "name,notes";

#[derive(Clone)]
pub struct AsanaClientConfig {
    pub access_token: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for AsanaClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsanaClientConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl AsanaClientConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    next_page: Option<NextPageToken>,
}

#[derive(Debug, Deserialize)]
struct NextPageToken {
    offset: Option<String>,
}

/// [`AsanaApi`] over the Asana REST API with a personal access token.
#[derive(Clone)]
pub struct HttpAsanaClient {
    http: Client,
    base_url: Url,
    access_token: String,
}

impl HttpAsanaClient {
    pub fn new(config: AsanaClientConfig) -> Result<Self> {
        let access_token = config.access_token.trim().to_string();
        if access_token.is_empty() {
            return Err(AsanaError::InvalidConfig(
                "access token must not be empty".to_string(),
            ));
        }

        let base_url = Url::parse(config.base_url.trim()).map_err(|err| {
            AsanaError::InvalidConfig(format!("invalid base URL '{}': {err}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AsanaError::InvalidConfig(format!(
                "base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("asana-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            access_token,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GETs one page. `Ok(None)` means the upstream answered 404.
    async fn get_page(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Option<Envelope>> {
        let url = self.endpoint(segments);
        log::debug!("GET {}", url.path());

        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AsanaError::api(status.as_u16(), &body));
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| AsanaError::Decode {
                endpoint: url.path().to_string(),
                source,
            })
    }

    async fn get_record(&self, segments: &[&str], opts: &RequestOptions) -> Result<Option<Value>> {
        let query = field_query(opts);
        let Some(envelope) = self.get_page(segments, &query).await? else {
            return Ok(None);
        };
        Ok(match envelope.data {
            Value::Null => None,
            record => Some(record),
        })
    }

    /// Reads a collection, following `next_page.offset` until exhausted.
    async fn get_collection(
        &self,
        segments: &[&str],
        mut query: Vec<(&'static str, String)>,
    ) -> Result<Vec<Value>> {
        query.push(("limit", MAX_PAGE_SIZE.to_string()));

        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        for _ in 0..MAX_COLLECTION_PAGES {
            let mut page_query = query.clone();
            if let Some(token) = offset.take() {
                page_query.push(("offset", token));
            }

            let envelope = self
                .get_page(segments, &page_query)
                .await?
                .ok_or_else(|| not_found(segments))?;
            records.extend(into_records(envelope.data, segments));

            match envelope.next_page.and_then(|next| next.offset) {
                Some(next) => offset = Some(next),
                None => return Ok(records),
            }
        }

        log::warn!(
            "Stopped reading /{} after {MAX_COLLECTION_PAGES} pages",
            segments.join("/")
        );
        Ok(records)
    }
}

fn field_query(opts: &RequestOptions) -> Vec<(&'static str, String)> {
    opts.opt_fields
        .as_ref()
        .map(|fields| vec![("opt_fields", fields.clone())])
        .unwrap_or_default()
}

fn not_found(segments: &[&str]) -> AsanaError {
    AsanaError::Api {
        status: 404,
        message: format!("/{} not found", segments.join("/")),
    }
}

fn into_records(data: Value, segments: &[&str]) -> Vec<Value> {
    match data {
        Value::Array(records) => records,
        Value::Null => Vec::new(),
        other => {
            log::warn!(
                "Expected an array from /{}, got {}",
                segments.join("/"),
                json_kind(&other)
            );
            Vec::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Case-insensitive name pattern. Queries that are not valid regular
/// expressions match literally.
fn name_pattern(query: &str) -> Result<Regex> {
    RegexBuilder::new(query)
        .case_insensitive(true)
        .build()
        .or_else(|_| {
            RegexBuilder::new(&regex::escape(query))
                .case_insensitive(true)
                .build()
        })
        .map_err(Into::into)
}

fn record_name(record: &Value) -> &str {
    record.get("name").and_then(Value::as_str).unwrap_or_default()
}

#[async_trait]
impl AsanaApi for HttpAsanaClient {
    async fn search_projects(
        &self,
        workspace: &str,
        query: &str,
        include_archived: bool,
        page: PageOptions,
    ) -> Result<Vec<Value>> {
        let pattern = name_pattern(query)?;
        let mut params = vec![("opt_fields", SEARCH_FIELDS.to_string())];
        if !include_archived {
            params.push(("archived", "false".to_string()));
        }

        let projects = self
            .get_collection(&["workspaces", workspace, "projects"], params)
            .await?;
        Ok(page.apply(
            projects
                .into_iter()
                .filter(|project| pattern.is_match(record_name(project))),
        ))
    }

    async fn search_tasks(&self, workspace: &str, search: &TaskSearch) -> Result<Vec<Value>> {
        // The search endpoint has no offset; over-fetch and skip locally.
        let offset = search.page.offset.unwrap_or(0);
        if offset >= TASK_SEARCH_WINDOW {
            log::debug!("Task search offset {offset} is past the {TASK_SEARCH_WINDOW}-result window");
            return Ok(Vec::new());
        }
        let wanted = search
            .page
            .limit
            .map(|limit| offset.saturating_add(u64::from(limit)))
            .unwrap_or(TASK_SEARCH_WINDOW)
            .clamp(1, TASK_SEARCH_WINDOW);

        let segments = ["workspaces", workspace, "tasks", "search"];
        let params = vec![
            ("text", search.text.clone()),
            ("opt_fields", SEARCH_FIELDS.to_string()),
            ("limit", wanted.to_string()),
        ];
        let envelope = self
            .get_page(&segments, &params)
            .await?
            .ok_or_else(|| not_found(&segments))?;
        Ok(search.page.apply(into_records(envelope.data, &segments)))
    }

    async fn get_task(&self, task_gid: &str) -> Result<Option<Value>> {
        self.get_record(&["tasks", task_gid], &RequestOptions::default())
            .await
    }

    async fn get_project(
        &self,
        project_gid: &str,
        opts: &RequestOptions,
    ) -> Result<Option<Value>> {
        self.get_record(&["projects", project_gid], opts).await
    }

    async fn get_project_sections(
        &self,
        project_gid: &str,
        opts: &RequestOptions,
    ) -> Result<Vec<Value>> {
        self.get_collection(&["projects", project_gid, "sections"], field_query(opts))
            .await
    }

    async fn get_project_custom_field_settings(
        &self,
        project_gid: &str,
        opts: &RequestOptions,
    ) -> Result<Vec<Value>> {
        self.get_collection(
            &["projects", project_gid, "custom_field_settings"],
            field_query(opts),
        )
        .await
    }

    async fn list_workspaces(&self, opts: &RequestOptions) -> Result<Vec<Value>> {
        self.get_collection(&["workspaces"], field_query(opts)).await
    }
}
