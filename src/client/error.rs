//! Error types for the GitHub client

use compact_str::CompactString;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response from {endpoint}: {message}")]
    JsonParse {
        endpoint: CompactString,
        message: CompactString,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP {status}: {message}")]
    GithubApi { status: u16, message: CompactString },

    #[error("Authentication failed: {message}")]
    Authentication { message: CompactString },

    #[error("Not found: {resource}: {message}")]
    NotFound {
        resource: CompactString,
        message: CompactString,
    },

    #[error("Rate limit exceeded: {message}")]
    RateLimit { message: CompactString },

    #[error("Invalid configuration for {field}: {message}")]
    ConfigValidation {
        field: CompactString,
        message: CompactString,
    },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: CompactString },
}

impl ClientError {
    pub fn json_parse(
        endpoint: impl Into<CompactString>,
        message: impl Into<CompactString>,
        source: serde_json::Error,
    ) -> Self {
        Self::JsonParse {
            endpoint: endpoint.into(),
            message: message.into(),
            source,
        }
    }

    pub fn github_api(status: u16, message: impl Into<CompactString>) -> Self {
        Self::GithubApi { status, message: message.into() }
    }

    pub fn not_found(resource: impl Into<CompactString>, message: impl Into<CompactString>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn config_validation(
        field: impl Into<CompactString>,
        message: impl Into<CompactString>,
    ) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}
