use compact_str::CompactString;
use serde::{Deserialize, Deserializer};

#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct RepoName {
    /// owner/repo identifier for GitHub
    value: CompactString,
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct CommitSha {
    value: CompactString,
}

#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct GistId {
    value: CompactString,
}

impl RepoName {
    pub fn new<S: Into<CompactString>>(name: S) -> Self {
        Self { value: name.into() }
    }
}

impl CommitSha {
    pub fn new<S: Into<CompactString>>(sha: S) -> Self {
        Self { value: sha.into() }
    }
}

impl GistId {
    pub fn new<S: Into<CompactString>>(id: S) -> Self {
        Self { value: id.into() }
    }
}

impl<'de> Deserialize<'de> for RepoName {
    fn deserialize<D>(deserializer: D) -> Result<RepoName, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = CompactString::deserialize(deserializer)?;
        Ok(RepoName::new(name))
    }
}

impl<'de> Deserialize<'de> for CommitSha {
    fn deserialize<D>(deserializer: D) -> Result<CommitSha, D::Error>
    where
        D: Deserializer<'de>,
    {
        let sha = CompactString::deserialize(deserializer)?;
        Ok(CommitSha::new(sha))
    }
}

impl std::fmt::Display for RepoName {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl std::fmt::Display for CommitSha {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl std::fmt::Display for GistId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
