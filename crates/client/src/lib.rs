//! # Asana client
//!
//! The upstream collaborator of the Asana MCP server.
//!
//! [`AsanaApi`] is the seam the request handlers depend on: seven read-only
//! operations returning raw Asana records as [`serde_json::Value`]. The shape of
//! those records is Asana's business; callers only read the fields they need.
//! [`HttpAsanaClient`] implements the trait against the REST API.
//!
//! ## Example
//!
//! ```no_run
//! use asana_client::{AsanaApi, AsanaClientConfig, HttpAsanaClient, RequestOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = HttpAsanaClient::new(AsanaClientConfig::new("token"))?;
//!     let workspaces = client.list_workspaces(&RequestOptions::fields("name,gid")).await?;
//!     println!("{} workspaces", workspaces.len());
//!     Ok(())
//! }
//! ```

mod api;
mod error;
mod http;

pub use api::{AsanaApi, PageOptions, RequestOptions, TaskSearch, TASK_SEARCH_WINDOW};
pub use error::{AsanaError, Result};
pub use http::{AsanaClientConfig, HttpAsanaClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
