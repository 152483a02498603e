//! Asana MCP Server
//!
//! Exposes Asana workspaces, projects and tasks to AI agents via MCP.
//!
//! ## Tools
//!
//! - `search` - Find projects or tasks in a workspace by name
//! - `fetch` - Read one project (with sections and custom fields) or task
//!
//! ## Resources
//!
//! - `asana://workspace/{gid}` - one resource per workspace
//! - `asana://project/{project_gid}` - template for project details
//!
//! ## Usage
//!
//! Add to your MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "asana": {
//!       "command": "asana-mcp",
//!       "env": { "ASANA_ACCESS_TOKEN": "<personal access token>" }
//!     }
//!   }
//! }
//! ```

pub mod config;
pub mod connector;
pub mod cursor;
pub mod diagnostics;
pub mod error;
pub mod format;
mod project;
pub mod resources;
pub mod service;

#[cfg(test)]
mod test_support;

pub use config::ServerConfig;
pub use connector::ConnectorHandlers;
pub use diagnostics::{DiagnosticSink, LogSink};
/// In-memory sink for tests that drive the server in-process.
pub use diagnostics::MemorySink;
pub use error::HandlerError;
pub use resources::ResourceHandlers;
pub use service::AsanaMcpService;

use anyhow::Result;
use asana_client::HttpAsanaClient;
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use std::sync::Arc;

pub async fn main_entry() -> Result<()> {
    // Configure logging to stderr only (stdout is for MCP protocol)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = ServerConfig::from_env()?;
    log::debug!("Loaded configuration: {config:?}");
    let client = HttpAsanaClient::new(config.client_config())?;

    log::info!("Starting Asana MCP server");

    let service = AsanaMcpService::new(Arc::new(client), Arc::new(LogSink));
    let server = service.serve(stdio()).await?;

    server.waiting().await?;

    log::info!("Asana MCP server stopped");
    Ok(())
}
