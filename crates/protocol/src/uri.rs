//! `asana://{kind}/{gid}` resource addressing.

use std::fmt;

pub const RESOURCE_SCHEME: &str = "asana";

pub const PROJECT_URI_TEMPLATE: &str = "asana://project/{project_gid}";

/// A parsed resource URI. Workspace and project URIs are disjoint, so the
/// parse order only short-circuits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    Workspace(String),
    Project(String),
}

impl ResourceUri {
    /// Returns `None` unless `raw` is exactly `asana://workspace/{gid}` or
    /// `asana://project/{gid}` with a non-empty, slash-free gid.
    pub fn parse(raw: &str) -> Option<Self> {
        let rest = raw
            .strip_prefix(RESOURCE_SCHEME)
            .and_then(|rest| rest.strip_prefix("://"))?;

        if let Some(gid) = segment_after(rest, "workspace/") {
            return Some(Self::Workspace(gid.to_string()));
        }
        if let Some(gid) = segment_after(rest, "project/") {
            return Some(Self::Project(gid.to_string()));
        }
        None
    }

    pub fn workspace(gid: &str) -> Self {
        Self::Workspace(gid.to_string())
    }

    pub fn gid(&self) -> &str {
        match self {
            Self::Workspace(gid) | Self::Project(gid) => gid,
        }
    }
}

fn segment_after<'a>(rest: &'a str, prefix: &str) -> Option<&'a str> {
    rest.strip_prefix(prefix)
        .filter(|gid| !gid.is_empty() && !gid.contains('/'))
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workspace(gid) => write!(f, "{RESOURCE_SCHEME}://workspace/{gid}"),
            Self::Project(gid) => write!(f, "{RESOURCE_SCHEME}://project/{gid}"),
        }
    }
}
