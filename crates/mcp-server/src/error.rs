use crate::cursor::CursorError;
use asana_client::AsanaError;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HandlerError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Workspace,
    Project,
    Task,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Workspace => "Workspace",
            Self::Project => "Project",
            Self::Task => "Task",
        })
    }
}

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingParameters(Vec<&'static str>),

    #[error("Unsupported search type: {0}")]
    UnsupportedSearchType(String),

    #[error("Unsupported fetch type: {0}")]
    UnsupportedFetchType(String),

    #[error("Invalid cursor: {0}")]
    InvalidCursor(#[from] CursorError),

    #[error("Invalid resource URI format: {0}")]
    InvalidResourceUri(String),

    #[error("{kind} not found: {gid}")]
    NotFound { kind: RecordKind, gid: String },

    #[error("Failed to read project: {source}")]
    ProjectRead {
        project_gid: String,
        #[source]
        source: Box<HandlerError>,
    },

    #[error("Asana API error: {0}")]
    Upstream(#[from] AsanaError),

    #[error("Failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl HandlerError {
    pub fn not_found(kind: RecordKind, gid: &str) -> Self {
        Self::NotFound {
            kind,
            gid: gid.to_string(),
        }
    }

    /// Stable machine-readable code for error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingParameters(_) => "invalid_request",
            Self::UnsupportedSearchType(_) | Self::UnsupportedFetchType(_) => "unsupported_type",
            Self::InvalidCursor(_) => "invalid_cursor",
            Self::InvalidResourceUri(_) => "invalid_uri",
            Self::NotFound { .. } => "not_found",
            Self::ProjectRead { source, .. } => source.code(),
            Self::Upstream(_) => "upstream",
            Self::Serialize(_) => "internal",
        }
    }

    /// The caller sent something we can never serve; retrying will not help.
    pub fn is_invalid_request(&self) -> bool {
        match self {
            Self::MissingParameters(_)
            | Self::UnsupportedSearchType(_)
            | Self::UnsupportedFetchType(_)
            | Self::InvalidCursor(_)
            | Self::InvalidResourceUri(_) => true,
            Self::ProjectRead { source, .. } => source.is_invalid_request(),
            Self::NotFound { .. } | Self::Upstream(_) | Self::Serialize(_) => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::ProjectRead { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingParameters(_) => Some("search needs type, workspace and query; fetch needs id and type"),
            Self::UnsupportedSearchType(_) | Self::UnsupportedFetchType(_) => {
                Some("type must be 'project' or 'task'")
            }
            Self::InvalidCursor(_) => Some("pass nextPage.cursor from the previous response unchanged"),
            Self::InvalidResourceUri(_) => {
                Some("use asana://workspace/{gid} or asana://project/{gid}")
            }
            _ => None,
        }
    }
}
