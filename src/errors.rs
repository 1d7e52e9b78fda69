use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{}", rejected_message(.status, .detail))]
    Rejected { status: u16, detail: Option<String> },

    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error("Invalid API address: {0}")]
    Config(#[from] url::ParseError),

    #[error("Could not prepare request: {0}")]
    Request(String),
}

impl ApiError {
    pub fn transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Network(err.to_string())
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Network(_))
    }

    /// Text shown to the user: the server's own message for rejected
    /// requests, `fallback` when it sent none, and the error itself otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected { detail, .. } => detail.clone().unwrap_or_else(|| fallback.to_owned()),
            other => other.to_string(),
        }
    }
}

fn rejected_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("Request failed with status code {status}"),
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write session storage: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode session storage: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_prefers_server_detail() {
        let err = ApiError::Rejected {
            status: 401,
            detail: Some("Wrong password".to_owned()),
        };
        assert_eq!(err.user_message("Login failed. Please try again."), "Wrong password");
        assert!(!err.is_network());
    }

    #[test]
    fn rejected_without_detail_uses_fallback() {
        let err = ApiError::Rejected { status: 500, detail: None };
        assert_eq!(err.user_message("Validation failed."), "Validation failed.");
        assert_eq!(err.to_string(), "Request failed with status code 500");
    }

    #[test]
    fn local_request_problems_are_not_network_errors() {
        let err = ApiError::Request("invalid mime type".to_owned());
        assert!(!err.is_network());
        assert_eq!(
            err.user_message("ignored"),
            "Could not prepare request: invalid mime type"
        );
    }

    #[test]
    fn timeout_reads_as_network_error() {
        let err = ApiError::Timeout(Duration::from_secs(10));
        assert!(err.is_network());
        assert_eq!(
            err.user_message("ignored"),
            "Network error: request timed out after 10s"
        );
    }
}
