//! Error types shared by the discovery pipeline.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconError {
    /// The configured certificate endpoint is not a valid URL.
    #[error("invalid certificate endpoint {endpoint}: {source}")]
    Endpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP client initialization error: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be completed or the body could not be read.
    #[error("certificate fetch failed: {0}")]
    Fetch(#[source] reqwest::Error),

    /// The certificate log answered with a non-success status.
    #[error("certificate log returned HTTP {status}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The body is not a JSON array of certificate records.
    #[error("certificate log response is not valid JSON: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("certificate fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("failed to read word list {}: {source}", .path.display())]
    WordList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{host} did not resolve: {reason}")]
    Resolution { host: String, reason: String },

    #[error("failed to load config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("interrupted")]
    Cancelled,
}

impl ReconError {
    /// Raw response body attached to fetch diagnostics, if any.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            ReconError::HttpStatus { body, .. } | ReconError::Decode { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_keeps_body() {
        let source = serde_json::from_str::<Vec<u8>>("<html>").unwrap_err();
        let err = ReconError::Decode { source, body: "<html>".to_string() };
        assert_eq!(err.response_body(), Some("<html>"));
        assert!(err.to_string().starts_with("certificate log response is not valid JSON"));
    }

    #[test]
    fn resolution_error_has_no_body() {
        let err = ReconError::Resolution { host: "a.example.com".into(), reason: "nxdomain".into() };
        assert!(err.response_body().is_none());
        assert_eq!(err.to_string(), "a.example.com did not resolve: nxdomain");
    }
}
