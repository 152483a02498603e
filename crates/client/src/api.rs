use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Offset/limit window applied to a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageOptions {
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

impl PageOptions {
    /// Skips `offset` records and keeps at most `limit` of the rest.
    pub fn apply<I>(&self, records: I) -> Vec<Value>
    where
        I: IntoIterator<Item = Value>,
    {
        let skip = usize::try_from(self.offset.unwrap_or(0)).unwrap_or(usize::MAX);
        let take = self
            .limit
            .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);
        records.into_iter().skip(skip).take(take).collect()
    }
}

/// Per-call options forwarded to Asana.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Comma-separated `opt_fields` selection.
    pub opt_fields: Option<String>,
}

impl RequestOptions {
    pub fn fields(opt_fields: impl Into<String>) -> Self {
        Self {
            opt_fields: Some(opt_fields.into()),
        }
    }
}

/// Task search only ever sees the first this-many matches; Asana's search
/// endpoint has no offset and caps a response at 100 records.
pub const TASK_SEARCH_WINDOW: u64 = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSearch {
    pub text: String,
    pub page: PageOptions,
}

/// Read-only Asana operations used by the MCP handlers.
#[async_trait]
pub trait AsanaApi: Send + Sync {
    /// Projects in `workspace` whose name matches `query`.
    async fn search_projects(
        &self,
        workspace: &str,
        query: &str,
        include_archived: bool,
        page: PageOptions,
    ) -> Result<Vec<Value>>;

    /// Full-text task search in `workspace`, windowed over the first
    /// [`TASK_SEARCH_WINDOW`] matches. Offsets at or past the window yield `[]`.
    async fn search_tasks(&self, workspace: &str, search: &TaskSearch) -> Result<Vec<Value>>;

    /// `None` when the task does not exist.
    async fn get_task(&self, task_gid: &str) -> Result<Option<Value>>;

    /// `None` when the project does not exist.
    async fn get_project(&self, project_gid: &str, opts: &RequestOptions)
        -> Result<Option<Value>>;

    async fn get_project_sections(
        &self,
        project_gid: &str,
        opts: &RequestOptions,
    ) -> Result<Vec<Value>>;

    async fn get_project_custom_field_settings(
        &self,
        project_gid: &str,
        opts: &RequestOptions,
    ) -> Result<Vec<Value>>;

    async fn list_workspaces(&self, opts: &RequestOptions) -> Result<Vec<Value>>;
}
