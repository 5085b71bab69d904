//! Disposable git checkout the classifier runs against

use std::path::{Component, Path, PathBuf};

use compact_str::CompactString;
use tokio::process::Command;
use tracing::{debug, instrument};

use super::breakdown::ClassifierOutput;
use crate::result::{AppError, Result};

/// Branch rebuilt from scratch on every run
pub const SCRATCH_BRANCH: &str = "temp";

/// Written inside `.git` of repositories this tool created
const OWNER_MARKER: &str = "recent-langs-workspace";

const ATTRIBUTES: &str = "\
* linguist-detectable linguist-generated=false linguist-vendored=false
.gitattributes -linguist-detectable
";

/// Single owner of a working directory whose contents are thrown away on
/// every [`Workspace::reset`]
#[derive(Debug)]
pub struct Workspace {
    dir: PathBuf,
    branch: CompactString,
}

impl Workspace {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            branch: SCRATCH_BRANCH.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Scratch location used when none is configured
    pub fn default_dir() -> PathBuf {
        std::env::temp_dir().join("recent-langs")
    }

    /// Leave an empty, history-less branch with no tracked or untracked files
    ///
    /// Only directories that are missing, empty, or were set up by an earlier
    /// reset are touched.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub async fn reset(&mut self) -> Result<()> {
        self.claim().await?;

        // A previous run leaves us on the scratch branch, which cannot be
        // recreated while checked out. Both steps fail harmlessly otherwise.
        if let Err(e) = self.git(&["checkout", "--quiet", "--detach"]).await {
            debug!(error = %e, "Nothing to detach from");
        }
        if let Err(e) = self.git(&["branch", "-D", self.branch.as_str()]).await {
            debug!(error = %e, "No scratch branch to delete");
        }

        self.git(&["checkout", "--quiet", "--orphan", self.branch.as_str()])
            .await?;
        self.git(&["rm", "-r", "-f", "--quiet", "--ignore-unmatch", "."])
            .await?;
        self.git(&["clean", "-f", "-d", "-x", "--quiet"]).await?;
        Ok(())
    }

    async fn claim(&self) -> Result<()> {
        let git_dir = self.dir.join(".git");
        let marker = git_dir.join(OWNER_MARKER);
        if marker.is_file() {
            return Ok(());
        }
        if git_dir.exists() || !self.is_empty_or_missing().await? {
            return Err(AppError::config_validation_error(
                "LINGUIST_WORKDIR",
                format!(
                    "{} is not empty and was not created by recent-langs",
                    self.dir.display()
                ),
            ));
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::io_error(&self.dir, e))?;
        self.git(&["init", "--quiet"]).await?;
        tokio::fs::write(&marker, "")
            .await
            .map_err(|e| AppError::io_error(marker, e))?;
        debug!("Initialised scratch repository");
        Ok(())
    }

    async fn is_empty_or_missing(&self) -> Result<bool> {
        match tokio::fs::read_dir(&self.dir).await {
            Ok(mut entries) => Ok(entries
                .next_entry()
                .await
                .map_err(|e| AppError::io_error(&self.dir, e))?
                .is_none()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(AppError::io_error(&self.dir, e)),
        }
    }

    /// Write a file directly under the workspace root
    pub async fn write(&mut self, name: &str, content: &str) -> Result<()> {
        let mut components = Path::new(name).components();
        let is_plain_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !is_plain_name {
            return Err(AppError::io_error(
                name,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "workspace files must be plain names",
                ),
            ));
        }

        let path = self.dir.join(name);
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| AppError::io_error(path, e))
    }

    /// Mark everything detectable and commit it under a throwaway identity
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub async fn commit(&mut self) -> Result<()> {
        self.write(".gitattributes", ATTRIBUTES).await?;
        self.git(&["add", "--all"]).await?;
        self.git(&[
            "-c",
            "user.name=dummy",
            "-c",
            "user.email=dummy@github.com",
            "-c",
            "commit.gpgsign=false",
            "commit",
            "--quiet",
            "--no-verify",
            "--allow-empty",
            "-m",
            "dummy",
        ])
        .await?;
        Ok(())
    }

    /// Run the classifier over the committed tree
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub async fn classify(&self, command: &str) -> Result<ClassifierOutput> {
        let stdout = self.run(command, &["--breakdown", "--json"]).await?;
        Ok(ClassifierOutput::parse(&stdout))
    }

    async fn git(&self, args: &[&str]) -> Result<String> {
        self.run("git", args).await
    }

    /// Run a command inside the workspace, failing on a non-zero exit
    async fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        let command_line = format!("{} {}", program, args.join(" "));
        debug!("run > {}", command_line);

        let output = Command::new(program)
            .args(args)
            .current_dir(&self.dir)
            .output()
            .await
            .map_err(|e| AppError::ExternalToolError {
                command: command_line.clone(),
                status: "spawn failure".into(),
                stderr: e.to_string(),
            })?;

        debug!(status = %output.status, "exited");

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(AppError::ExternalToolError {
                command: command_line,
                status: output.status.to_string().into(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
