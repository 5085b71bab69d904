use std::path::PathBuf;

use clap::Parser;

use crate::{client::config::DEFAULT_BASE_URL, linguist::Workspace};

/// Publish the languages you recently pushed to a GitHub gist
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    /// GitHub access token with gist scope
    #[arg(long, env = "GH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Gist whose first file receives the report
    #[arg(long, env = "GIST_ID")]
    pub gist_id: Option<String>,

    /// GitHub user whose push events are analysed
    #[arg(long, env = "USERNAME")]
    pub username: Option<String>,

    /// Lookback window in days, clamped to 1..=30
    #[arg(long, env = "DAYS")]
    pub days: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Disposable git checkout the classifier runs in; its contents are wiped
    #[arg(long, env = "LINGUIST_WORKDIR", default_value_os_t = Workspace::default_dir())]
    pub workdir: PathBuf,

    /// Language classifier executable
    #[arg(long, env = "LINGUIST_COMMAND", default_value = "github-linguist")]
    pub linguist: String,

    /// Dump every GitHub response body into this directory
    #[arg(long, env = "LOG_RESPONSES_DIR")]
    pub log_responses: Option<PathBuf>,

    /// Also write logs to files in this directory
    #[arg(long, env = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}
