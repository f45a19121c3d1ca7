//! Version-control client
//!
//! The engine never links a VCS library; it drives an external `git`
//! process through the narrow capability interface below. Child output is
//! streamed through as it arrives (clones can run for minutes) while
//! stderr is also captured so a failing command carries its diagnostics.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::revision::RevisionId;

/// Capability interface over the version-control client.
///
/// Three operations are all the engine needs: obtain a branch without
/// populating the working tree, pin the working tree to an exact revision,
/// and strip the metadata directory so a checkout becomes a plain file
/// tree.
#[async_trait]
pub trait VcsClient: Send + Sync {
    /// Clone `branch` of `url` into `dest` without checking out files.
    async fn clone_branch(&self, url: &str, branch: &str, dest: &Path) -> Result<()>;

    /// Check out the working tree of `dest` at exactly `revision`.
    async fn checkout_revision(&self, dest: &Path, revision: &RevisionId) -> Result<()>;

    /// Remove version-control metadata from `dest`, leaving a plain tree.
    async fn strip_vcs_metadata(&self, dest: &Path) -> Result<()>;
}

/// `git` command-line implementation of [`VcsClient`].
#[derive(Debug, Default)]
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }

    /// Run `git` with `args`, awaiting completion.
    ///
    /// stdout is streamed through at debug level; stderr (where git writes
    /// its progress and its errors) is streamed at info level and captured
    /// for the error value of a non-zero exit.
    async fn run_git(&self, args: Vec<OsString>, cwd: Option<&Path>) -> Result<()> {
        let command_line = std::iter::once("git".to_string())
            .chain(args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ");

        let mut command = Command::new("git");
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        tracing::debug!(command = %command_line, "Running version-control command");

        let mut child = command.spawn().map_err(|e| Error::Spawn {
            command: command_line.clone(),
            source: e,
        })?;

        let stdout = child.stdout.take().expect("stdout was piped");
        let stderr = child.stderr.take().expect("stderr was piped");

        let stdout_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::debug!(target: "kit_vcs::git", "{line}");
            }
        });

        let stderr_task = tokio::spawn(async move {
            let mut captured = String::new();
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::info!(target: "kit_vcs::git", "{line}");
                captured.push_str(&line);
                captured.push('\n');
            }
            captured
        });

        let status = child.wait().await.map_err(|e| Error::Spawn {
            command: command_line.clone(),
            source: e,
        })?;

        let _ = stdout_task.await;
        let diagnostics = stderr_task.await.unwrap_or_default();

        if !status.success() {
            return Err(Error::CommandFailed {
                command: command_line,
                code: status.code(),
                diagnostics,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl VcsClient for GitCli {
    async fn clone_branch(&self, url: &str, branch: &str, dest: &Path) -> Result<()> {
        self.run_git(
            vec![
                OsString::from("clone"),
                OsString::from("--no-checkout"),
                OsString::from("--branch"),
                OsString::from(branch),
                OsString::from(url),
                dest.as_os_str().to_os_string(),
            ],
            None,
        )
        .await
    }

    async fn checkout_revision(&self, dest: &Path, revision: &RevisionId) -> Result<()> {
        self.run_git(
            vec![OsString::from("checkout"), OsString::from(revision.as_str())],
            Some(dest),
        )
        .await
    }

    async fn strip_vcs_metadata(&self, dest: &Path) -> Result<()> {
        let git_dir = dest.join(".git");
        match tokio::fs::remove_dir_all(&git_dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io {
                path: git_dir,
                source: e,
            }),
        }
    }
}
