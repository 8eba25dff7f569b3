use std::time::Duration;
use thiserror::Error;

/// Rejections raised while turning the form into a request. Nothing is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please provide a URL before sending.")]
    EmptyUrl,

    /// `line` is 1-based and counts blank lines.
    #[error("Header on line {line} is missing a colon: '{text}'")]
    MalformedHeader { line: usize, text: String },
}

impl ValidationError {
    /// The form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyUrl => "url",
            ValidationError::MalformedHeader { .. } => "headers",
        }
    }
}

/// Transport-level failures. The dispatcher turns these into `Response::Failure`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("DNS resolution failed: {0}")]
    Resolve(String),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request timed out after {timeout:?}: {detail}")]
    Timeout { timeout: Duration, detail: String },

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let detail = error_chain(&err);
        if err.is_builder() {
            TransportError::InvalidRequest(detail)
        } else if err.is_timeout() {
            TransportError::Timeout {
                timeout: Duration::ZERO,
                detail,
            }
        } else if err.is_connect() && detail.contains("dns error") {
            TransportError::Resolve(detail)
        } else if err.is_connect() {
            TransportError::Connect(detail)
        } else if err.is_body() || err.is_decode() {
            TransportError::Body(detail)
        } else {
            TransportError::Other(detail)
        }
    }
}

/// Joins an error with all of its sources, outermost first.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_header_message_names_line() {
        let err = ValidationError::MalformedHeader {
            line: 2,
            text: "malformed-line".to_string(),
        };
        assert_eq!(err.field(), "headers");
        assert!(err.to_string().contains("line 2"));
        assert!(err.to_string().contains("malformed-line"));
    }

    #[test]
    fn test_timeout_message_includes_duration() {
        let err = TransportError::Timeout {
            timeout: Duration::from_secs(60),
            detail: "operation timed out".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request timed out after 60s: operation timed out"
        );
    }

    #[test]
    fn test_timeout_message_keeps_sub_second_precision() {
        let err = TransportError::Timeout {
            timeout: Duration::from_millis(500),
            detail: "operation timed out".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Request timed out after 500ms: operation timed out"
        );
    }

    #[test]
    fn test_resolve_message_mentions_resolution() {
        let err = TransportError::Resolve("failed to lookup address information".to_string());
        assert!(err.to_string().contains("resolution failed"));
    }
}
