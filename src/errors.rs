use thiserror::Error;

/// Where a catalog request broke down
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStage {
    /// Could not reach the host at all
    Connect,
    /// Request was built or sent incorrectly
    Request,
    /// Body could not be read or decoded
    ResponseParsing,
}

impl std::fmt::Display for ConnectionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl ConnectionStage {
    pub fn display_name(&self) -> &'static str {
        match self {
            ConnectionStage::Connect => "Connect",
            ConnectionStage::Request => "Request",
            ConnectionStage::ResponseParsing => "Response Parsing",
        }
    }

    /// Actionable hint shown next to the failure
    pub fn suggestion(&self) -> &'static str {
        match self {
            ConnectionStage::Connect => "Check your internet connection or the configured TMDB base URL.",
            ConnectionStage::Request => "The request was rejected before reaching TMDB. Check the configuration.",
            ConnectionStage::ResponseParsing => "TMDB returned an unexpected payload. Try again later.",
        }
    }
}

/// Errors raised by the catalog client.
///
/// Payloads are plain strings so the error can be cloned into
/// [`crate::app::AsyncAction`] messages.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("No TMDB API key configured")]
    MissingApiKey,

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Connection failed at {0}: {1}")]
    ConnectionFailed(ConnectionStage, String),

    #[error("Server returned {0}: {1}")]
    ServerError(u16, String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl CatalogError {
    pub fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout(timeout_secs)
        } else if err.is_decode() {
            CatalogError::ParseError(err.to_string())
        } else if let Some(status) = err.status() {
            CatalogError::ServerError(status.as_u16(), err.to_string())
        } else if err.is_connect() {
            CatalogError::ConnectionFailed(ConnectionStage::Connect, err.to_string())
        } else if err.is_body() {
            CatalogError::ConnectionFailed(ConnectionStage::ResponseParsing, err.to_string())
        } else {
            CatalogError::ConnectionFailed(ConnectionStage::Request, err.to_string())
        }
    }

    pub fn diagnostics(&self) -> String {
        match self {
            CatalogError::MissingApiKey => {
                "Missing API Key\nSuggestion: set TMDB_API_KEY or tmdb.api_key in config.json".to_string()
            }
            CatalogError::Timeout(secs) => {
                format!("Timeout\nWaited: {} seconds\nSuggestion: TMDB is slow or unreachable", secs)
            }
            CatalogError::ConnectionFailed(stage, source) => {
                format!("Connection Failed at {}\nError: {}\nSuggestion: {}", stage.display_name(), source, stage.suggestion())
            }
            CatalogError::ServerError(401, _) => {
                "Server Error\nStatus: 401\nSuggestion: The TMDB API key was rejected".to_string()
            }
            CatalogError::ServerError(status, message) => {
                format!("Server Error\nStatus: {}\nMessage: {}\nSuggestion: Try again later", status, message)
            }
            CatalogError::ParseError(source) => {
                format!("Parse Error\nError: {}\nSuggestion: TMDB response is invalid", source)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_mentions_suggestion() {
        let err = CatalogError::ConnectionFailed(ConnectionStage::Connect, "refused".into());
        let text = err.diagnostics();
        assert!(text.contains("Connect"));
        assert!(text.contains("refused"));
        assert!(text.contains("Suggestion"));
    }

    #[test]
    fn test_unauthorized_has_dedicated_hint() {
        let err = CatalogError::ServerError(401, "Unauthorized".into());
        assert!(err.diagnostics().contains("API key"));
        assert_eq!(err.to_string(), "Server returned 401: Unauthorized");
    }
}
