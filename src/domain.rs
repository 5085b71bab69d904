use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::Deserialize;

use crate::id::{CommitSha, RepoName};

/// One file's diff within a commit
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileChange {
    pub path: CompactString,
    pub additions: u64,
    pub deletions: u64,
    pub changes: u64,
    #[allow(dead_code)]
    pub status: FileStatus,
    /// Absent when GitHub considers the diff too large to inline
    pub patch: Option<String>,
}

/// Per-language row of the final report
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LanguageStat {
    pub name: CompactString,
    pub percent: f64,
    pub additions: u64,
    pub deletions: u64,
    pub count: usize,
}

impl LanguageStat {
    pub fn changes(&self) -> u64 {
        self.additions + self.deletions
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Added,
    Removed,
    #[default]
    Modified,
    Renamed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventDto {
    #[serde(rename = "type")]
    pub kind: CompactString,
    pub actor: ActorDto,
    pub repo: RepoDto,
    #[serde(default)]
    pub payload: PushPayloadDto,
    pub created_at: DateTime<Utc>,
}

impl EventDto {
    pub fn is_push_by(&self, username: &str) -> bool {
        self.kind == "PushEvent" && self.actor.login == username
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorDto {
    pub login: CompactString,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoDto {
    pub name: RepoName,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushPayloadDto {
    #[serde(default)]
    pub commits: Vec<PushCommitDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushCommitDto {
    pub sha: CommitSha,
    /// False when the commit was already pushed elsewhere
    #[serde(default)]
    pub distinct: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitDto {
    pub sha: CommitSha,
    #[serde(default)]
    pub parents: Vec<ParentDto>,
    #[serde(default)]
    pub files: Vec<FileDto>,
}

impl CommitDto {
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParentDto {
    #[allow(dead_code)]
    pub sha: CommitSha,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileDto {
    pub filename: CompactString,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub changes: u64,
    #[serde(default)]
    pub status: FileStatus,
    pub patch: Option<String>,
}

impl From<FileDto> for FileChange {
    fn from(dto: FileDto) -> Self {
        Self {
            path: dto.filename,
            additions: dto.additions,
            deletions: dto.deletions,
            changes: dto.changes,
            status: dto.status,
            patch: dto.patch,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GistDto {
    /// Keyed by file name, in the order GitHub returns them
    #[serde(default)]
    pub files: serde_json::Map<String, serde_json::Value>,
}

impl GistDto {
    pub fn first_file_name(&self) -> Option<&str> {
        self.files.keys().next().map(String::as_str)
    }
}
