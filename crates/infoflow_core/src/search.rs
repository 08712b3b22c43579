use std::fmt;

use thiserror::Error;

use crate::Article;

pub const CONNECTION_FAILURE_MESSAGE: &str = "Could not reach the news server";
pub const PROTOCOL_FAILURE_MESSAGE: &str = "The news server sent an unreadable response";
pub const SEARCH_FAILED_MESSAGE: &str = "News search failed";

/// One page of results returned by the backend.
///
/// `total_count` is what the backend reports and may exceed `articles.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResponse {
    pub articles: Vec<Article>,
    pub total_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// No response could be obtained (refused, reset, timed out).
    #[error("connection failed: {0}")]
    Connection(String),
    /// A response arrived but its body was not the expected JSON.
    #[error("malformed response: {0}")]
    Protocol(String),
    /// The backend answered with a non-2xx status or `success = false`.
    #[error("backend rejected search ({}): {}", BackendStatus(.status), .message.as_deref().unwrap_or("no message"))]
    Backend {
        status: Option<u16>,
        message: Option<String>,
    },
}

struct BackendStatus<'a>(&'a Option<u16>);

impl fmt::Display for BackendStatus<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self.0 {
            Some(code) => write!(f, "http {code}"),
            None => f.write_str("success=false"),
        }
    }
}

impl SearchError {
    pub fn backend(status: Option<u16>, message: Option<String>) -> Self {
        let message = message
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        SearchError::Backend { status, message }
    }

    /// Text shown to the user when a session ends in Error.
    pub fn user_message(&self) -> String {
        match self {
            SearchError::Connection(_) => CONNECTION_FAILURE_MESSAGE.to_string(),
            SearchError::Protocol(_) => PROTOCOL_FAILURE_MESSAGE.to_string(),
            SearchError::Backend { message, .. } => message
                .clone()
                .unwrap_or_else(|| SEARCH_FAILED_MESSAGE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_is_surfaced_verbatim() {
        let err = SearchError::backend(None, Some("quota exceeded".to_string()));
        assert_eq!(err.user_message(), "quota exceeded");
    }

    #[test]
    fn blank_backend_message_falls_back() {
        let err = SearchError::backend(Some(500), Some("   ".to_string()));
        assert_eq!(
            err,
            SearchError::Backend {
                status: Some(500),
                message: None
            }
        );
        assert_eq!(err.user_message(), SEARCH_FAILED_MESSAGE);
    }

    #[test]
    fn transport_and_protocol_messages_are_generic() {
        let conn = SearchError::Connection("tcp connect error: refused".to_string());
        let proto = SearchError::Protocol("expected value at line 1".to_string());
        assert_eq!(conn.user_message(), CONNECTION_FAILURE_MESSAGE);
        assert_eq!(proto.user_message(), PROTOCOL_FAILURE_MESSAGE);
    }

    #[test]
    fn display_includes_status() {
        let err = SearchError::backend(Some(503), None);
        assert_eq!(err.to_string(), "backend rejected search (http 503): no message");
    }
}
