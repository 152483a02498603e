//! In-memory [`AsanaApi`] for handler tests.

use asana_client::{
    AsanaApi, AsanaError, PageOptions, RequestOptions, TaskSearch, TASK_SEARCH_WINDOW,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Default)]
pub(crate) struct FakeAsana {
    pub projects: Vec<Value>,
    pub tasks: Vec<Value>,
    pub task_records: HashMap<String, Value>,
    pub project_records: HashMap<String, Value>,
    pub sections: Vec<Value>,
    pub custom_field_settings: Vec<Value>,
    pub workspaces: Vec<Value>,
    pub fail_project: bool,
    pub fail_sections: bool,
    pub fail_custom_fields: bool,
    pub fail_workspaces: bool,
    pub(crate) calls: Mutex<Vec<String>>,
}

fn boom(what: &str) -> AsanaError {
    AsanaError::Api {
        status: 500,
        message: format!("{what} unavailable"),
    }
}

impl FakeAsana {
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: String) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

fn fields(opts: &RequestOptions) -> &str {
    opts.opt_fields.as_deref().unwrap_or("-")
}

#[async_trait]
impl AsanaApi for FakeAsana {
    async fn search_projects(
        &self,
        workspace: &str,
        query: &str,
        include_archived: bool,
        page: PageOptions,
    ) -> asana_client::Result<Vec<Value>> {
        self.record(format!(
            "search_projects({workspace}, {query}, {include_archived}, {:?}, {:?})",
            page.limit, page.offset
        ));
        Ok(page.apply(self.projects.clone()))
    }

    async fn search_tasks(
        &self,
        workspace: &str,
        search: &TaskSearch,
    ) -> asana_client::Result<Vec<Value>> {
        self.record(format!(
            "search_tasks({workspace}, {}, {:?}, {:?})",
            search.text, search.page.limit, search.page.offset
        ));
        let window = usize::try_from(TASK_SEARCH_WINDOW).unwrap_or(usize::MAX);
        Ok(search
            .page
            .apply(self.tasks.iter().take(window).cloned()))
    }

    async fn get_task(&self, task_gid: &str) -> asana_client::Result<Option<Value>> {
        self.record(format!("get_task({task_gid})"));
        Ok(self.task_records.get(task_gid).cloned())
    }

    async fn get_project(
        &self,
        project_gid: &str,
        opts: &RequestOptions,
    ) -> asana_client::Result<Option<Value>> {
        self.record(format!("get_project({project_gid}, {})", fields(opts)));
        if self.fail_project {
            return Err(boom("project"));
        }
        Ok(self.project_records.get(project_gid).cloned())
    }

    async fn get_project_sections(
        &self,
        project_gid: &str,
        opts: &RequestOptions,
    ) -> asana_client::Result<Vec<Value>> {
        self.record(format!("get_project_sections({project_gid}, {})", fields(opts)));
        if self.fail_sections {
            return Err(boom("sections"));
        }
        Ok(self.sections.clone())
    }

    async fn get_project_custom_field_settings(
        &self,
        project_gid: &str,
        _opts: &RequestOptions,
    ) -> asana_client::Result<Vec<Value>> {
        self.record(format!("get_project_custom_field_settings({project_gid})"));
        if self.fail_custom_fields {
            return Err(boom("custom fields"));
        }
        Ok(self.custom_field_settings.clone())
    }

    async fn list_workspaces(&self, opts: &RequestOptions) -> asana_client::Result<Vec<Value>> {
        self.record(format!("list_workspaces({})", fields(opts)));
        if self.fail_workspaces {
            return Err(boom("workspaces"));
        }
        Ok(self.workspaces.clone())
    }
}
