//! Repository store
//!
//! Managed clones live under a single root, keyed by GitHub coordinates:
//!
//! ```text
//! <repos-root>/<owner>/<repo>
//! ```
//!
//! [`RepositoryStore::ensure`] is idempotent: a healthy checkout is reused,
//! a missing one is cloned, and a corrupt one (deleted `.git`, broken object
//! store) is removed and cloned fresh.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use crate::config::GitlinkConfig;
use crate::git::{GitError, Repository};
use crate::link::LinkSpec;
use crate::prompt::{Severity, UserInteraction};
use crate::shell_exec;

/// Locates and materializes clones for parsed links.
#[derive(Debug, Clone)]
pub struct RepositoryStore {
    repos_root: PathBuf,
    clone_base: String,
    network_timeout: Duration,
}

impl RepositoryStore {
    pub fn new(config: &GitlinkConfig) -> Self {
        Self {
            repos_root: config.repos_root(),
            clone_base: "https://github.com".to_string(),
            network_timeout: config.network_timeout(),
        }
    }

    /// Store with an explicit root and clone URL base. Tests point
    /// `clone_base` at a directory of bare repositories.
    pub fn at(
        repos_root: impl Into<PathBuf>,
        clone_base: impl Into<String>,
        network_timeout: Duration,
    ) -> Self {
        Self {
            repos_root: repos_root.into(),
            clone_base: clone_base.into(),
            network_timeout,
        }
    }

    /// Where the checkout for `spec` lives, whether or not it exists yet.
    pub fn checkout_path(&self, spec: &LinkSpec) -> PathBuf {
        self.repos_root.join(&spec.owner).join(&spec.repo)
    }

    /// Return a usable repository for `spec`, cloning if needed.
    ///
    /// A directory that exists but fails `git status` is treated as corrupt:
    /// it is removed and re-cloned rather than patched up. After a fresh
    /// clone of a non-default branch link, the branch is checked out
    /// immediately so the caller starts from the right place.
    pub fn ensure(
        &self,
        spec: &LinkSpec,
        default_branch: &str,
        ui: &dyn UserInteraction,
    ) -> anyhow::Result<Repository> {
        let path = self.checkout_path(spec);
        let repo = Repository::at(&path);

        if path.exists() {
            if repo.is_valid() {
                log::debug!("reusing checkout at {}", path.display());
                return Ok(repo);
            }
            log::warn!(
                "checkout at {} is not a valid repository, re-cloning",
                path.display()
            );
            ui.notify(
                Severity::Warning,
                &format!("Existing checkout of {} is corrupt, re-cloning", spec.slug()),
            );
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove corrupt checkout {}", path.display()))?;
        }

        self.clone(spec, &path, ui)?;

        // Land on the requested branch right away when it isn't the clone's
        // default. Missing on the remote too is a real error here.
        if spec.branch != default_branch && !matches!(repo.current_branch()?, Some(ref b) if *b == spec.branch)
        {
            if repo.local_branch_exists(&spec.branch)? {
                repo.checkout(&spec.branch)?;
            } else {
                repo.fetch_branch("origin", &spec.branch, self.network_timeout)
                    .map_err(|e| -> anyhow::Error {
                        match e.downcast::<GitError>() {
                            Ok(git_err @ GitError::NetworkTimeout { .. }) => git_err.into(),
                            _ => GitError::BranchNotFound {
                                branch: spec.branch.clone(),
                                remote: "origin".to_string(),
                            }
                            .into(),
                        }
                    })?;
                repo.checkout_tracking("origin", &spec.branch)?;
            }
        }

        Ok(repo)
    }

    fn clone(
        &self,
        spec: &LinkSpec,
        path: &std::path::Path,
        ui: &dyn UserInteraction,
    ) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let url = format!("{}/{}/{}.git", self.clone_base, spec.owner, spec.repo);
        ui.notify(Severity::Info, &format!("Cloning {}...", spec.slug()));

        let mut cmd = std::process::Command::new("git");
        cmd.args(["clone", &url]).arg(path);

        let output = shell_exec::run_with_timeout(&mut cmd, self.network_timeout, Some(&spec.repo))?;
        let Some(output) = output else {
            return Err(GitError::NetworkTimeout {
                operation: format!("git clone {url}"),
                seconds: self.network_timeout.as_secs(),
            }
            .into());
        };

        if !output.status.success() {
            // Leave no half-clone behind
            if path.exists() {
                let _ = std::fs::remove_dir_all(path);
            }
            return Err(GitError::CloneFailed {
                owner: spec.owner.clone(),
                repo: spec.repo.clone(),
                error: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        ui.notify(Severity::Info, &format!("Cloned {}", spec.slug()));
        Ok(())
    }
}
