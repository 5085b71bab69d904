//! Language breakdown of a set of file changes
//!
//! Changes are rebuilt as stand-in files in a scratch repository, an external
//! classifier reports which language each file is, and its attributions are
//! joined back onto the changes' addition and deletion counts.

pub mod breakdown;
pub mod synthetic;
pub mod workspace;

use std::collections::HashMap;

use compact_str::CompactString;
use tracing::{info, instrument};

use crate::{
    domain::{FileChange, LanguageStat},
    result::Result,
};
pub use breakdown::LanguageBreakdown;
pub use workspace::Workspace;

/// Classifier bound to the workspace it runs in
#[derive(Debug)]
pub struct Linguist {
    workspace: Workspace,
    command: CompactString,
}

impl Linguist {
    pub fn new(workspace: Workspace, command: impl Into<CompactString>) -> Self {
        Self { workspace, command: command.into() }
    }

    /// Languages touched by `files`, highest percentage first
    #[instrument(skip_all, fields(file_count = files.len()))]
    pub async fn analyze(&mut self, files: &[FileChange]) -> Result<Vec<LanguageStat>> {
        let synthetic = synthetic::synthesize(files);

        self.workspace.reset().await?;
        for file in &synthetic {
            self.workspace.write(&file.path, &file.content).await?;
        }
        self.workspace.commit().await?;

        let output = self.workspace.classify(&self.command).await?;
        let sources: HashMap<&str, &FileChange> = synthetic
            .iter()
            .map(|file| (file.path.as_str(), &files[file.source]))
            .collect();

        let languages = aggregate(output.into_breakdown(), &sources);
        info!(
            dir = %self.workspace.dir().display(),
            language_count = languages.len(),
            "Classified changes"
        );
        Ok(languages)
    }
}

/// Sum each language's attributed changes and order by percentage
///
/// Paths the classifier reports but that match no change still count as files.
pub fn aggregate(
    breakdown: Vec<LanguageBreakdown>,
    sources: &HashMap<&str, &FileChange>,
) -> Vec<LanguageStat> {
    let mut languages: Vec<LanguageStat> = breakdown
        .into_iter()
        .map(|language| {
            let attributed = language.files.iter().filter_map(|path| sources.get(path.as_str()));
            let (additions, deletions) = attributed.fold((0, 0), |(adds, dels), change| {
                (adds + change.additions, dels + change.deletions)
            });

            LanguageStat {
                name: language.name,
                percent: language.percent,
                additions,
                deletions,
                count: language.files.len(),
            }
        })
        .collect();

    languages.sort_by(|a, b| b.percent.total_cmp(&a.percent));
    languages
}
