//! High-level GitHub service operations

use std::{collections::HashSet, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::{
    api::GithubApi,
    error::{ClientError, Result},
};
use crate::{
    domain::{CommitDto, EventDto},
    id::{CommitSha, GistId, RepoName},
};

/// Display name given to the published gist file
pub const GIST_TITLE: &str = "💻 Recent coding in languages";

/// High-level service for GitHub operations
///
/// Walks a user's event feed for recent pushes and writes reports back to a gist
#[derive(Debug, Clone)]
pub struct GithubService {
    api: Arc<GithubApi>,
}

/// A page ends the walk once some of its push events fall outside the window
pub fn is_last_page(recent_count: usize, push_count: usize) -> bool {
    recent_count < push_count
}

impl GithubService {
    pub fn new(api: Arc<GithubApi>) -> Self {
        Self { api }
    }

    /// Fetch full detail for every distinct commit `username` pushed after `since`
    ///
    /// Pages are requested strictly in order. A failing page ends the walk
    /// with what was collected so far. Commits within a page are fetched
    /// concurrently and individual failures are dropped.
    #[instrument(skip(self), fields(since = %since))]
    pub async fn recent_commits(&self, username: &str, since: DateTime<Utc>) -> Vec<CommitDto> {
        let request = &self.api.config().request;
        let mut seen: HashSet<(RepoName, CommitSha)> = HashSet::new();
        let mut commits = Vec::new();

        for page in 1..=request.max_pages() {
            let events = match self.api.get_user_events(username, page).await {
                Ok(events) => events,
                Err(e) => {
                    warn!(error = %e, page, "No more pages to load");
                    break;
                },
            };

            let full_page = events.len() >= request.per_page as usize;
            let push_events: Vec<EventDto> = events
                .into_iter()
                .filter(|event| event.is_push_by(username))
                .collect();
            let push_count = push_events.len();
            let recent: Vec<EventDto> = push_events
                .into_iter()
                .filter(|event| event.created_at > since)
                .collect();
            let is_end = is_last_page(recent.len(), push_count) || !full_page;

            info!(page, "{} events fetched.", recent.len());

            let refs: Vec<(RepoName, CommitSha)> = recent
                .iter()
                .flat_map(|event| {
                    event
                        .payload
                        .commits
                        .iter()
                        .filter(|commit| commit.distinct)
                        .map(|commit| (event.repo.name.clone(), commit.sha.clone()))
                })
                .filter(|key| seen.insert(key.clone()))
                .collect();

            commits.extend(self.fetch_commits(refs).await);

            if is_end {
                debug!(page, "Reached the end of the lookback window");
                break;
            }
        }

        info!("{} commits fetched.", commits.len());
        commits
    }

    /// Fetch commits concurrently, keeping only the ones that succeeded
    async fn fetch_commits(&self, refs: Vec<(RepoName, CommitSha)>) -> Vec<CommitDto> {
        let handles: Vec<JoinHandle<Result<CommitDto>>> = refs
            .into_iter()
            .map(|(repo, sha)| {
                let api = Arc::clone(&self.api);
                tokio::spawn(async move { api.get_commit(&repo, &sha).await })
            })
            .collect();

        let mut commits = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(Ok(commit)) => {
                    debug!(sha = %commit.sha, file_count = commit.files.len(), "Fetched commit");
                    commits.push(commit);
                },
                Ok(Err(e)) => warn!(error = %e, "Dropping commit that failed to fetch"),
                Err(e) => warn!(error = %e, "Commit fetch task did not complete"),
            }
        }
        commits
    }

    /// Replace the first file of `gist_id` with `content`
    #[instrument(skip(self, content), fields(gist_id = %gist_id))]
    pub async fn publish(&self, gist_id: &GistId, content: &str) -> Result<()> {
        let gist = self.api.get_gist(gist_id).await?;
        let file_name = gist.first_file_name().ok_or_else(|| {
            ClientError::not_found(format!("/gists/{gist_id}"), "Gist has no files")
        })?;

        self.api
            .update_gist_file(gist_id, file_name, GIST_TITLE, content)
            .await?;

        info!(file_name, "Update succeeded.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::{Value, json};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, method, path, query_param},
    };

    use super::*;
    use crate::client::config::ClientConfig;

    fn service_for(server: &MockServer) -> GithubService {
        let api = GithubApi::new(ClientConfig::new(server.uri(), "test-token")).unwrap();
        GithubService::new(Arc::new(api))
    }

    fn push_event(login: &str, repo: &str, created_at: DateTime<Utc>, shas: &[&str]) -> Value {
        json!({
            "type": "PushEvent",
            "actor": { "login": login },
            "repo": { "name": repo },
            "payload": {
                "commits": shas
                    .iter()
                    .map(|sha| json!({ "sha": sha, "distinct": true }))
                    .collect::<Vec<_>>()
            },
            "created_at": created_at.to_rfc3339(),
        })
    }

    fn commit(sha: &str) -> Value {
        json!({ "sha": sha, "parents": [ { "sha": "p" } ], "files": [] })
    }

    /// Pads a page to the full page size with events from another actor
    fn full_page(mut events: Vec<Value>) -> Value {
        let filler = json!({
            "type": "WatchEvent",
            "actor": { "login": "someone" },
            "repo": { "name": "someone/else" },
            "payload": {},
            "created_at": Utc::now().to_rfc3339(),
        });
        events.resize(100, filler);
        Value::Array(events)
    }

    #[test]
    fn page_with_stale_pushes_is_last() {
        assert!(is_last_page(2, 3));
        assert!(!is_last_page(3, 3));
        assert!(!is_last_page(0, 0));
    }

    #[tokio::test]
    async fn stops_on_page_containing_old_events() {
        let server = MockServer::start().await;
        let now = Utc::now();
        let since = now - Duration::days(14);

        Mock::given(method("GET"))
            .and(path("/users/octocat/events"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(full_page(vec![
                push_event("octocat", "octocat/a", now, &["new"]),
                push_event("octocat", "octocat/a", now - Duration::days(20), &["old"]),
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/events"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(path("/repos/octocat/a/commits/new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(commit("new")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(path("/repos/octocat/a/commits/old"))
            .respond_with(ResponseTemplate::new(200).set_body_json(commit("old")))
            .expect(0)
            .mount(&server)
            .await;

        let commits = service_for(&server).recent_commits("octocat", since).await;
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].sha.to_string(), "new");
    }

    #[tokio::test]
    async fn continues_across_full_pages_and_stops_on_error() {
        let server = MockServer::start().await;
        let now = Utc::now();

        Mock::given(path("/users/octocat/events"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(full_page(vec![
                push_event("octocat", "octocat/a", now, &["one"]),
            ])))
            .mount(&server)
            .await;
        Mock::given(path("/users/octocat/events"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({ "message": "In order to keep the API fast" })),
            )
            .mount(&server)
            .await;
        Mock::given(path("/users/octocat/events"))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(path("/repos/octocat/a/commits/one"))
            .respond_with(ResponseTemplate::new(200).set_body_json(commit("one")))
            .mount(&server)
            .await;

        let commits = service_for(&server)
            .recent_commits("octocat", now - Duration::days(1))
            .await;
        assert_eq!(commits.len(), 1);
    }

    #[tokio::test]
    async fn skips_foreign_and_duplicate_commits_and_drops_failures() {
        let server = MockServer::start().await;
        let now = Utc::now();
        let mut shared = push_event("octocat", "octocat/a", now, &["dup"]);
        shared["payload"]["commits"][0]["distinct"] = json!(false);

        Mock::given(path("/users/octocat/events"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                push_event("octocat", "octocat/a", now, &["ok", "broken"]),
                push_event("octocat", "octocat/a", now, &["ok"]),
                push_event("intruder", "octocat/a", now, &["foreign"]),
                shared,
            ])))
            .mount(&server)
            .await;
        Mock::given(path("/repos/octocat/a/commits/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(commit("ok")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(path("/repos/octocat/a/commits/broken"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "boom" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(path("/repos/octocat/a/commits/foreign"))
            .respond_with(ResponseTemplate::new(200).set_body_json(commit("foreign")))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(path("/repos/octocat/a/commits/dup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(commit("dup")))
            .expect(0)
            .mount(&server)
            .await;

        let commits = service_for(&server)
            .recent_commits("octocat", now - Duration::days(1))
            .await;
        let shas: Vec<String> = commits.iter().map(|c| c.sha.to_string()).collect();
        assert_eq!(shas, vec!["ok"]);
    }

    #[tokio::test]
    async fn publish_replaces_first_gist_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gists/g1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "files": { "langs.txt": { "content": "old" }, "other.txt": {} }
            })))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/gists/g1"))
            .and(body_partial_json(json!({
                "files": { "langs.txt": { "filename": GIST_TITLE, "content": "report" } }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": {} })))
            .expect(1)
            .mount(&server)
            .await;

        service_for(&server)
            .publish(&GistId::new("g1"), "report")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn publish_fails_for_empty_gist() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gists/g1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": {} })))
            .mount(&server)
            .await;

        let err = service_for(&server)
            .publish(&GistId::new("g1"), "report")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotFound { .. }));
    }
}
