//! End-to-end run: recent pushes in, gist report out

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use crate::{
    client::{ClientConfig, GithubApi, GithubService},
    config::AppConfig,
    domain::{CommitDto, FileChange},
    linguist::{Linguist, Workspace},
    report,
    result::Result,
};

/// Flatten commits into file changes, leaving out merge commits
pub fn collect_file_changes(commits: Vec<CommitDto>) -> Vec<FileChange> {
    commits
        .into_iter()
        .filter(|commit| !commit.is_merge())
        .flat_map(|commit| commit.files.into_iter().map(FileChange::from))
        .collect()
}

/// Run once and return the content that was published
#[instrument(skip_all, fields(username = %config.username, days = config.days))]
pub async fn run(config: &AppConfig) -> Result<String> {
    info!("username is {}.", config.username);

    let api = GithubApi::new(ClientConfig::from(config))?;
    let service = GithubService::new(Arc::new(api));

    let since = config.window_start(Utc::now());
    let commits = service.recent_commits(&config.username, since).await;
    let files = collect_file_changes(commits);

    let mut linguist = Linguist::new(Workspace::new(&config.workdir), config.linguist.clone());
    let languages = linguist.analyze(&files).await?;
    for language in &languages {
        info!(
            "{}: {} files, {} changes",
            language.name,
            language.count,
            language.changes()
        );
    }

    let content = report::render(&languages);
    info!("\n{}", content);

    service.publish(&config.gist_id, &content).await?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, method, path, query_param},
    };

    use super::*;
    use crate::{id::GistId, linguist::workspace::tests as workspace_tests};

    fn commit(sha: &str, parents: usize, files: serde_json::Value) -> CommitDto {
        serde_json::from_value(json!({
            "sha": sha,
            "parents": (0..parents).map(|i| json!({ "sha": format!("p{i}") })).collect::<Vec<_>>(),
            "files": files,
        }))
        .unwrap()
    }

    #[test]
    fn merge_commits_are_left_out() {
        let commits = vec![
            commit("a", 1, json!([{ "filename": "a.rs", "changes": 1 }])),
            commit("m", 2, json!([{ "filename": "m.rs", "changes": 9 }])),
            commit("root", 0, json!([{ "filename": "r.rs" }, { "filename": "r.md" }])),
        ];

        let files = collect_file_changes(commits);
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["a.rs", "r.rs", "r.md"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn publishes_report_for_recent_push() {
        if !workspace_tests::has_git() {
            return;
        }
        let server = MockServer::start().await;
        let now = Utc::now();

        Mock::given(method("GET"))
            .and(path("/users/octocat/events"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "type": "PushEvent",
                "actor": { "login": "octocat" },
                "repo": { "name": "octocat/app" },
                "payload": { "commits": [
                    { "sha": "feature", "distinct": true },
                    { "sha": "merge", "distinct": true }
                ] },
                "created_at": (now - Duration::hours(2)).to_rfc3339(),
            }])))
            .mount(&server)
            .await;
        Mock::given(path("/repos/octocat/app/commits/feature"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sha": "feature",
                "parents": [ { "sha": "base" } ],
                "files": [ {
                    "filename": "src/main.rs", "additions": 2, "deletions": 1,
                    "changes": 3, "status": "modified"
                } ]
            })))
            .mount(&server)
            .await;
        Mock::given(path("/repos/octocat/app/commits/merge"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sha": "merge",
                "parents": [ { "sha": "a" }, { "sha": "b" } ],
                "files": [ {
                    "filename": "vendor/big.js", "additions": 5000, "deletions": 0,
                    "changes": 5000, "status": "added"
                } ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gists/g1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "files": { "recent.txt": { "content": "" } }
            })))
            .mount(&server)
            .await;

        let expected = format!("Rust            +2/     -1 {}100.0%", "█".repeat(21));
        Mock::given(method("PATCH"))
            .and(path("/gists/g1"))
            .and(body_partial_json(json!({
                "files": { "recent.txt": { "content": expected } }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": {} })))
            .expect(1)
            .mount(&server)
            .await;

        let tools = tempfile::tempdir().unwrap();
        let stub = workspace_tests::stub_classifier(
            tools.path(),
            r#"{"Rust": {"percentage": "100.00", "files": ["0.rs"]}}"#,
        );
        let scratch = tempfile::tempdir().unwrap();
        let config = AppConfig {
            token: "test-token".into(),
            gist_id: GistId::new("g1"),
            username: "octocat".into(),
            days: 14,
            api_url: server.uri().into(),
            workdir: scratch.path().to_path_buf(),
            linguist: stub.to_str().unwrap().into(),
            log_responses: None,
        };

        let content = run(&config).await.unwrap();
        assert_eq!(content, expected);
        assert_eq!(
            std::fs::read_to_string(scratch.path().join("0.rs")).unwrap(),
            "\n\n\n"
        );
        assert!(!scratch.path().join("1.js").exists());
    }
}
