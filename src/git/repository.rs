//! Repository handle
//!
//! [`Repository`] wraps a working-tree path and runs git against it by
//! shelling out. Every invocation goes through [`crate::shell_exec`] so
//! commands show up in debug logs with timing.
//!
//! Network-bound operations (fetch, pull) take an explicit deadline and
//! surface [`GitError::NetworkTimeout`] when it expires; git itself would
//! happily hang forever on an unreachable remote.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::bail;

use super::error::GitError;
use crate::shell_exec;

/// Handle to a git repository at a known path.
///
/// Deliberately does not cache branch or dirty state: the sync pass switches
/// branches and creates stashes mid-flight, so every query hits git.
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    /// Create a handle for the repository at `path`.
    ///
    /// Does not validate; use [`Repository::is_valid`] to check the path
    /// actually holds a working repository.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Short identifier for log lines, the directory name.
    pub fn logging_context(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Run a git command in this repository, returning trimmed stdout.
    ///
    /// A non-zero exit becomes an error carrying git's stderr (and stdout,
    /// since git splits diagnostics across both).
    pub fn run_command(&self, args: &[&str]) -> anyhow::Result<String> {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.path);

        let output = shell_exec::run(&mut cmd, Some(&self.logging_context()))?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let combined = [stderr.trim(), stdout.trim()]
                .iter()
                .filter(|s| !s.is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join("\n");
            bail!("git {} failed: {}", args.join(" "), combined)
        }
    }

    /// Run a git command where a non-zero exit is an answer, not an error.
    pub fn run_command_check(&self, args: &[&str]) -> anyhow::Result<bool> {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.path);

        let output = shell_exec::run(&mut cmd, Some(&self.logging_context()))?;
        Ok(output.status.success())
    }

    /// Run a network-bound git command with a deadline.
    ///
    /// Timeout becomes [`GitError::NetworkTimeout`]; other failures carry
    /// git's combined output like [`Repository::run_command`].
    pub fn run_network_command(&self, args: &[&str], timeout: Duration) -> anyhow::Result<String> {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.path);

        let output = shell_exec::run_with_timeout(&mut cmd, timeout, Some(&self.logging_context()))?;
        let Some(output) = output else {
            return Err(GitError::NetworkTimeout {
                operation: format!("git {}", args.join(" ")),
                seconds: timeout.as_secs(),
            }
            .into());
        };

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let combined = [stderr.trim(), stdout.trim()]
                .iter()
                .filter(|s| !s.is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join("\n");
            bail!("git {} failed: {}", args.join(" "), combined)
        }
    }

    /// Whether the path holds a usable git repository.
    ///
    /// Any directory where `git status` runs cleanly counts; a deleted
    /// `.git` or corrupted object store does not.
    pub fn is_valid(&self) -> bool {
        self.path.is_dir()
            && self
                .run_command_check(&["status", "--porcelain"])
                .unwrap_or(false)
    }

    /// Whether the working tree has uncommitted changes, staged, unstaged,
    /// or untracked.
    pub fn is_dirty(&self) -> anyhow::Result<bool> {
        let status = self.run_command(&["status", "--porcelain"])?;
        Ok(!status.is_empty())
    }

    /// Current branch name, or `None` when HEAD is detached.
    pub fn current_branch(&self) -> anyhow::Result<Option<String>> {
        let branch = self.run_command(&["branch", "--show-current"])?;
        Ok(if branch.is_empty() { None } else { Some(branch) })
    }

    /// Absolute root of the working tree containing this path.
    pub fn worktree_root(&self) -> anyhow::Result<PathBuf> {
        let root = self.run_command(&["rev-parse", "--show-toplevel"])?;
        Ok(dunce::canonicalize(PathBuf::from(root))?)
    }

    /// Whether `branch` exists as a local branch.
    pub fn local_branch_exists(&self, branch: &str) -> anyhow::Result<bool> {
        self.run_command_check(&[
            "rev-parse",
            "--verify",
            "--quiet",
            &format!("refs/heads/{branch}"),
        ])
    }

    /// Check out an existing local branch.
    pub fn checkout(&self, branch: &str) -> anyhow::Result<()> {
        match self.run_command(&["checkout", branch]) {
            Ok(_) => Ok(()),
            Err(e) => Err(GitError::CheckoutFailed {
                branch: branch.to_string(),
                error: e.to_string(),
            }
            .into()),
        }
    }

    /// Create a local branch tracking `remote/branch` and check it out.
    ///
    /// Used when a link names a branch that exists on the remote but has
    /// never been checked out here. Always produces a named local branch,
    /// never a detached HEAD.
    pub fn checkout_tracking(&self, remote: &str, branch: &str) -> anyhow::Result<()> {
        match self.run_command(&[
            "checkout",
            "-b",
            branch,
            "--track",
            &format!("{remote}/{branch}"),
        ]) {
            Ok(_) => Ok(()),
            Err(e) => Err(GitError::CheckoutFailed {
                branch: branch.to_string(),
                error: e.to_string(),
            }
            .into()),
        }
    }

    /// Fetch all refs from `remote`.
    pub fn fetch(&self, remote: &str, timeout: Duration) -> anyhow::Result<()> {
        self.run_network_command(&["fetch", remote], timeout)?;
        Ok(())
    }

    /// Fetch a single branch from `remote`.
    pub fn fetch_branch(&self, remote: &str, branch: &str, timeout: Duration) -> anyhow::Result<()> {
        self.run_network_command(&["fetch", remote, branch], timeout)?;
        Ok(())
    }

    /// Total commit count reachable from `reference`.
    pub fn rev_list_count(&self, reference: &str) -> anyhow::Result<u64> {
        let count = self.run_command(&["rev-list", "--count", reference])?;
        Ok(count.parse()?)
    }

    /// How many commits the remote branch has beyond HEAD, by total
    /// reachable-commit counts. Zero when local is ahead or equal.
    pub fn commits_behind(&self, remote: &str, branch: &str) -> anyhow::Result<u64> {
        let local = self.rev_list_count("HEAD")?;
        let remote_count = self.rev_list_count(&format!("{remote}/{branch}"))?;
        Ok(remote_count.saturating_sub(local))
    }

    /// Pull with rebase from `remote/branch`.
    ///
    /// A conflict leaves the repository exactly as git leaves it, mid-rebase
    /// with markers, and surfaces [`GitError::RebaseConflict`].
    pub fn pull_rebase(&self, remote: &str, branch: &str, timeout: Duration) -> anyhow::Result<()> {
        match self.run_network_command(&["pull", "--rebase", remote, branch], timeout) {
            Ok(_) => Ok(()),
            Err(e) => {
                if e.downcast_ref::<GitError>().is_some() {
                    return Err(e);
                }
                Err(GitError::RebaseConflict {
                    branch: branch.to_string(),
                    git_output: e.to_string(),
                }
                .into())
            }
        }
    }

    /// Stash the working tree, untracked files included.
    pub fn stash_push(&self, message: &str) -> anyhow::Result<()> {
        self.run_command(&["stash", "push", "--include-untracked", "-m", message])?;
        Ok(())
    }

    /// Reapply and drop the most recent stash entry.
    pub fn stash_pop(&self) -> anyhow::Result<()> {
        self.run_command(&["stash", "pop"])?;
        Ok(())
    }

    /// Number of entries in the stash.
    pub fn stash_count(&self) -> anyhow::Result<usize> {
        let list = self.run_command(&["stash", "list"])?;
        Ok(list.lines().filter(|l| !l.trim().is_empty()).count())
    }

    /// Stage everything under the working tree.
    pub fn stage_all(&self) -> anyhow::Result<()> {
        self.run_command(&["add", "."])?;
        Ok(())
    }

    /// Commit staged changes with `message`.
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        self.run_command(&["commit", "-m", message])?;
        Ok(())
    }

    /// Configured remotes as `(name, url)` pairs, in git's listing order.
    pub fn remotes(&self) -> anyhow::Result<Vec<(String, String)>> {
        let names = self.run_command(&["remote"])?;
        let mut result = Vec::new();
        for name in names.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let url = self.run_command(&["remote", "get-url", name])?;
            result.push((name.to_string(), url));
        }
        Ok(result)
    }
}
