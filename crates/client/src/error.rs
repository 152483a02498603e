use serde::Deserialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AsanaError>;

#[derive(Error, Debug)]
pub enum AsanaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Asana API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Deserialize)]
struct ErrorEntry {
    message: Option<String>,
}

impl AsanaError {
    /// Builds an API error from a non-success response body, preferring the first
    /// message of Asana's `errors` array over the raw body.
    pub fn api(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.errors.into_iter().find_map(|entry| entry.message))
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    "no response body".to_string()
                } else {
                    trimmed.chars().take(200).collect()
                }
            });
        Self::Api { status, message }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::AsanaError;
    use pretty_assertions::assert_eq;

    #[test]
    fn api_error_prefers_upstream_message() {
        let err = AsanaError::api(
            403,
            r#"{"errors":[{"message":"Not authorized","help":"..."}]}"#,
        );
        assert_eq!(err.to_string(), "Asana API returned 403: Not authorized");
    }

    #[test]
    fn api_error_falls_back_to_body() {
        let err = AsanaError::api(502, "  Bad Gateway \n");
        assert_eq!(err.to_string(), "Asana API returned 502: Bad Gateway");

        let err = AsanaError::api(500, "");
        assert_eq!(err.to_string(), "Asana API returned 500: no response body");
    }

    #[test]
    fn not_found_is_detected_by_status() {
        assert!(AsanaError::api(404, "").is_not_found());
        assert!(!AsanaError::api(400, "").is_not_found());
    }
}
