//! Core HTTP client for GitHub API

use chrono::Local;
use compact_str::{CompactString, format_compact};
use reqwest::{Client, Method, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::{debug, instrument, warn};

use super::{
    config::ClientConfig,
    error::{ClientError, Result},
};
use crate::{
    domain::{CommitDto, EventDto, GistDto},
    id::{CommitSha, GistId, RepoName},
};

/// Pure HTTP client for GitHub API
#[derive(Debug)]
pub struct GithubApi {
    client: Client,
    config: ClientConfig,
}

/// GitHub API error response body
#[derive(Debug, Deserialize)]
struct GithubApiError {
    message: CompactString,
}

impl GithubApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self { client, config })
    }

    /// Get current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform an authenticated REST call against a path such as `/gists/{id}`
    #[instrument(skip(self, body), fields(method = %method))]
    pub async fn request<T, B>(&self, path: &str, method: Method, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.config.url_for(path);
        let mut request = self
            .client
            .request(method, url.as_str())
            .bearer_auth(&self.config.token)
            .header("Content-Type", "application/json")
            .header("Accept", "application/vnd.github.v3+json");

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Perform an authenticated GraphQL query
    #[allow(dead_code)]
    #[instrument(skip_all)]
    pub async fn request_graphql<T>(&self, query: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let body = json!({ "query": query.replace('\n', " ") });
        let response = self
            .client
            .post(self.config.graphql_url().as_str())
            .bearer_auth(&self.config.token)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// One page of public events performed by a user, newest first
    #[instrument(skip(self))]
    pub async fn get_user_events(&self, username: &str, page: u32) -> Result<Vec<EventDto>> {
        let path = format_compact!(
            "/users/{}/events?per_page={}&page={}",
            username,
            self.config.request.per_page,
            page
        );
        let events: Vec<EventDto> = self.get_json(&path).await?;
        debug!(event_count = events.len(), "Fetched events page");
        Ok(events)
    }

    /// Full commit detail including per-file diffs
    #[instrument(skip(self), fields(repo = %repo, sha = %sha))]
    pub async fn get_commit(&self, repo: &RepoName, sha: &CommitSha) -> Result<CommitDto> {
        let path = format_compact!("/repos/{}/commits/{}", repo, sha);
        self.get_json(&path).await
    }

    #[instrument(skip(self), fields(gist_id = %gist_id))]
    pub async fn get_gist(&self, gist_id: &GistId) -> Result<GistDto> {
        let path = format_compact!("/gists/{}", gist_id);
        self.get_json(&path).await
    }

    /// Replace one gist file's content and display name
    #[instrument(skip(self, content), fields(gist_id = %gist_id))]
    pub async fn update_gist_file(
        &self,
        gist_id: &GistId,
        file_name: &str,
        title: &str,
        content: &str,
    ) -> Result<GistDto> {
        let path = format_compact!("/gists/{}", gist_id);
        let body = json!({
            "files": {
                file_name: {
                    "filename": title,
                    "content": content,
                }
            }
        });

        self.request(&path, Method::PATCH, Some(&body)).await
    }

    async fn get_json<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request::<T, ()>(path, Method::GET, None).await
    }

    /// Handle HTTP response and deserialize JSON
    async fn handle_response<T>(&self, response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url_path = response.url().path().to_string();
        let status = response.status();
        let body = response.text().await?;

        if self.config.debug.log_directory.is_some() {
            self.log_response_to_file(&url_path, &body);
        }

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| {
                debug!(endpoint = %url_path, error = %e, "Response body did not match");
                ClientError::json_parse(url_path, "Failed to parse response", e)
            })
        } else {
            Err(Self::error_from_response(status.as_u16(), &url_path, &body))
        }
    }

    /// Map a failed response onto an error carrying the server's message
    fn error_from_response(status: u16, path: &str, body: &str) -> ClientError {
        let message = serde_json::from_str::<GithubApiError>(body)
            .map(|e| e.message)
            .unwrap_or_else(|_| {
                if body.trim().is_empty() {
                    format_compact!("HTTP {}", status)
                } else {
                    body.trim().into()
                }
            });

        match status {
            401 => ClientError::Authentication { message },
            404 => ClientError::not_found(path, message),
            429 => ClientError::RateLimit { message },
            403 if message.contains("rate limit") => ClientError::RateLimit { message },
            _ => ClientError::github_api(status, message),
        }
    }

    /// Log HTTP response to file for debugging
    fn log_response_to_file(&self, path: &str, body: &str) {
        let Some(log_dir) = &self.config.debug.log_directory else {
            return;
        };

        if !log_dir.exists()
            && let Err(e) = std::fs::create_dir_all(log_dir)
        {
            warn!("Failed to create log directory: {}", e);
            return;
        }

        let filename = format!(
            "{}_{}.json",
            Local::now().format("%Y-%m-%d_%H-%M-%S%.3f"),
            path.replace('/', "_")
        );

        let log_path = log_dir.join(filename);

        if let Err(e) = std::fs::write(&log_path, body) {
            warn!("Failed to write response log to {:?}: {}", log_path, e);
        } else {
            debug!("Response logged to {:?}", log_path);
        }
    }
}
