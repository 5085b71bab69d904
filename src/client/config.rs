//! Configuration management for GitHub client

use std::path::PathBuf;

use compact_str::{CompactString, format_compact};

use super::error::{ClientError, Result};
use crate::config::AppConfig;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Main configuration for GitHub client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GitHub REST API base URL
    pub base_url: CompactString,
    /// Personal access token sent as bearer credentials
    pub token: CompactString,
    /// Value of the User-Agent header
    pub user_agent: CompactString,
    /// Request configuration
    pub request: RequestConfig,
    /// Debug configuration
    pub debug: DebugConfig,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Number of items per page for paginated requests
    pub per_page: u32,
    /// Upper bound on events GitHub will serve for a user
    pub max_events: u32,
}

/// Debug and logging configuration
#[derive(Debug, Clone, Default)]
pub struct DebugConfig {
    /// Directory for storing raw response bodies, disabled when unset
    pub log_directory: Option<PathBuf>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { per_page: 100, max_events: 300 }
    }
}

impl RequestConfig {
    pub fn max_pages(&self) -> u32 {
        self.max_events.div_ceil(self.per_page.max(1))
    }
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<CompactString>, token: impl Into<CompactString>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            user_agent: format_compact!("recent-langs/{}", env!("CARGO_PKG_VERSION")),
            request: RequestConfig::default(),
            debug: DebugConfig::default(),
        }
    }

    /// GraphQL endpoint living next to the REST base
    pub fn graphql_url(&self) -> CompactString {
        format_compact!("{}/graphql", self.base_url.trim_end_matches('/'))
    }

    /// Absolute URL for a REST path such as `/gists/{id}`
    pub fn url_for(&self, path: &str) -> CompactString {
        format_compact!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(ClientError::config_validation(
                "token",
                "Access token cannot be empty",
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::config_validation(
                "api_url",
                "Base URL must start with http:// or https://",
            ));
        }

        if url::Url::parse(&self.base_url).is_err() {
            return Err(ClientError::InvalidUrl { url: self.base_url.clone() });
        }

        if self.request.per_page == 0 || self.request.per_page > 100 {
            return Err(ClientError::config_validation(
                "per_page",
                "per_page must be between 1 and 100",
            ));
        }

        Ok(())
    }

    /// Set debug configuration
    pub fn with_debug(mut self, debug: DebugConfig) -> Self {
        self.debug = debug;
        self
    }
}

impl From<&AppConfig> for ClientConfig {
    fn from(config: &AppConfig) -> Self {
        Self::new(config.api_url.clone(), config.token.clone()).with_debug(DebugConfig {
            log_directory: config.log_responses.clone(),
        })
    }
}
